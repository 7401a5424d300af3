// ABOUTME: Value algebra, string/list/hashmap objects, lambdas and atoms
//
// There is no separate object-registry struct: `Rc` plus `Drop` plays that
// role here, reclaiming every object except genuine closure/environment
// cycles, which a short-lived interpreter process can live with.

pub mod atom;
pub mod hashmap;
pub mod list;
pub mod lstring;
pub mod value;

pub use atom::Atom;
pub use hashmap::{HashKey, MalMap};
pub use list::MalList;
pub use lstring::LString;
pub use value::{Builtin, BuiltinFn, Lambda, Value};
