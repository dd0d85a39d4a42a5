//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::{load_ledger_for_update, save_ledger, Out};
use crate::{Config, Result};

/// Deletes an expense by ID.
///
/// An unknown ID is not an error: the returned structure is `false` and the ledger file is not
/// rewritten.
pub fn delete_expense(config: Config, args: DeleteArgs) -> Result<Out<bool>> {
    let id = args.id();
    let mut ledger = load_ledger_for_update(&config)?;
    if !ledger.delete(id) {
        return Ok(Out::new(format!("No expense found with ID {id}"), false));
    }
    save_ledger(&config, &ledger)?;
    Ok(Out::new(format!("Deleted expense {id}"), true))
}
