//! Single entry point a host embedding calls to populate a fresh
//! `ClassRegistry`/`HostRegistry` pair with every class this crate backs,
//! before constructing the `Interpreter` (which eagerly declares static
//! fields for everything already in the registry at that point).

use objectir::host::HostRegistry;
use objectir::module::ClassRegistry;

use crate::{collections, console, convert, math, string_fns};

pub fn register_all(registry: &mut ClassRegistry, host: &mut HostRegistry) {
    console::register(registry, host);
    math::register(registry, host);
    string_fns::register(registry, host);
    convert::register(registry, host);
    collections::register(registry, host);
}
