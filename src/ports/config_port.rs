//! Configuration access port trait.
//!
//! Values are looked up by `[section] key`. Typed parsing and validation
//! happen in [`crate::domain::config`], so the port only hands out strings.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
