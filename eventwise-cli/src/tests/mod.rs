//! Shared test harness modules for the Eventwise CLI.

use super::*;

mod helpers;
mod unit;
