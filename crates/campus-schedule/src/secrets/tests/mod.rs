mod common;
mod routing;
mod vault;
