mod common;
mod persist;
mod routing;
