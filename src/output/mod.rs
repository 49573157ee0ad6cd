// Output formatting — terminal rendering of status lines and state.

pub mod terminal;
