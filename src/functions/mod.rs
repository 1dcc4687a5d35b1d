pub mod basic;
pub mod trig;

use crate::capabilities::FunctionTable;

/// Registers the calculator's standard functions.
pub fn register_functions(table: &mut FunctionTable) {
    basic::register(table);
    trig::register(table);
}

/// A table holding the standard functions.
pub fn standard_table() -> FunctionTable {
    let mut table = FunctionTable::new();
    register_functions(&mut table);
    table
}
