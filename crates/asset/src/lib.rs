//! Asset loading: OBJ text to flat, draw-ready geometry.

pub mod error;
pub mod geometry;
pub mod obj;
pub mod record;

pub use error::{AttributeKind, ObjError, ObjResult};
pub use geometry::{Geometry, IndexedGeometry};
pub use obj::{
    load_obj_from_path, load_obj_from_path_with, load_obj_from_reader, load_obj_from_reader_with,
    load_obj_from_str, load_obj_from_str_with, parse_obj, parse_obj_indexed, parse_obj_with,
};
pub use record::ObjOptions;
