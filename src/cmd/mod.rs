//! Mode dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to [`list`], [`check`]
//! or, by default, [`run`]. Each mode lives in its own submodule.

pub mod check;
pub mod list;
pub mod run;

use crate::cli::Cli;
use crate::error::HttpDebugError;

pub async fn dispatch(cli: Cli) -> Result<(), HttpDebugError> {
    if cli.list {
        list::execute();
        Ok(())
    } else if cli.check {
        check::execute(&cli)
    } else {
        run::execute(cli).await
    }
}
