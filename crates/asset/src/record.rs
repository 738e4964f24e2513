//! One OBJ line turned into a typed record.
//!
//! Face indices are converted to zero-based table offsets here. Relative
//! (negative) indices are resolved against the table lengths passed in, so
//! downstream code only ever sees absolute offsets. Bounds are checked later,
//! when the face is emitted.

use std::str::SplitWhitespace;

use crate::error::{AttributeKind, ObjError, ObjResult};

/// Parser knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjOptions {
    /// Maximum number of components read from a `vt` row (1..=3).
    pub max_texture_components: usize,
}

impl ObjOptions {
    pub const MAX_TEXTURE_COMPONENTS: usize = 3;

    pub fn with_texture_components(max_texture_components: usize) -> Self {
        Self {
            max_texture_components: max_texture_components.clamp(1, Self::MAX_TEXTURE_COMPONENTS),
        }
    }

    fn texture_limit(&self) -> usize {
        self.max_texture_components.clamp(1, Self::MAX_TEXTURE_COMPONENTS)
    }
}

impl Default for ObjOptions {
    fn default() -> Self {
        Self {
            max_texture_components: Self::MAX_TEXTURE_COMPONENTS,
        }
    }
}

/// `v x y z [w]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub w: f32,
}

/// `vt u [v [w]]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TexCoord {
    pub u: f32,
    pub v: Option<f32>,
    pub w: Option<f32>,
}

impl TexCoord {
    /// Components as emitted, with missing ones defaulted to 0.
    pub fn to_array(self) -> [f32; 3] {
        [self.u, self.v.unwrap_or(0.0), self.w.unwrap_or(0.0)]
    }
}

/// `vn i j k`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normal {
    pub direction: [f32; 3],
}

/// One `v/vt/vn` reference of a face, as zero-based table offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceRef {
    pub vertex: usize,
    pub texture: Option<usize>,
    pub normal: Option<usize>,
}

/// Fan split used for triangles and quads.
const FAN: [[usize; 3]; 2] = [[0, 1, 2], [0, 2, 3]];

/// A triangle or quad.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Face {
    refs: Vec<FaceRef>,
}

impl Face {
    pub fn refs(&self) -> &[FaceRef] {
        &self.refs
    }

    /// Triangles in emission order: `(0,1,2)` and, for quads, `(0,2,3)`.
    pub fn triangles(&self) -> impl Iterator<Item = [FaceRef; 3]> + '_ {
        FAN[..self.refs.len() - 2]
            .iter()
            .map(|&tri| tri.map(|corner| self.refs[corner]))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Vertex(Vertex),
    TexCoord(TexCoord),
    Normal(Normal),
    Face(Face),
    /// Unknown keyword (`o`, `g`, `s`, `usemtl`, ...).
    Ignored,
}

/// Table sizes at the point a line is read, for relative indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableLens {
    pub vertices: usize,
    pub textures: usize,
    pub normals: usize,
}

impl TableLens {
    pub fn of(&self, kind: AttributeKind) -> usize {
        match kind {
            AttributeKind::Vertex => self.vertices,
            AttributeKind::Texture => self.textures,
            AttributeKind::Normal => self.normals,
        }
    }
}

/// Parse one trimmed, non-empty, non-comment line.
pub fn parse_record(
    trimmed: &str,
    line: usize,
    options: &ObjOptions,
    lens: TableLens,
) -> ObjResult<Record> {
    let mut parts = trimmed.split_whitespace();
    let Some(tag) = parts.next() else {
        return Ok(Record::Ignored);
    };

    let record = match tag {
        "v" => {
            let x = required_f32(parts.next(), line, "x coordinate")?;
            let y = required_f32(parts.next(), line, "y coordinate")?;
            let z = required_f32(parts.next(), line, "z coordinate")?;
            let w = optional_f32(parts.next(), line)?.unwrap_or(1.0);
            Record::Vertex(Vertex {
                position: [x, y, z],
                w,
            })
        }
        "vt" => {
            let limit = options.texture_limit();
            let u = required_f32(parts.next(), line, "u coordinate")?;
            let v = if limit >= 2 { optional_f32(parts.next(), line)? } else { None };
            let w = if limit >= 3 { optional_f32(parts.next(), line)? } else { None };
            Record::TexCoord(TexCoord { u, v, w })
        }
        "vn" => {
            let i = required_f32(parts.next(), line, "i component")?;
            let j = required_f32(parts.next(), line, "j component")?;
            let k = required_f32(parts.next(), line, "k component")?;
            Record::Normal(Normal {
                direction: [i, j, k],
            })
        }
        "f" => Record::Face(parse_face(parts, line, lens)?),
        _ => Record::Ignored,
    };
    Ok(record)
}

fn parse_face(parts: SplitWhitespace<'_>, line: usize, lens: TableLens) -> ObjResult<Face> {
    let tokens: Vec<&str> = parts.collect();
    if !(3..=4).contains(&tokens.len()) {
        return Err(ObjError::InvalidFaceArity {
            line,
            count: tokens.len(),
        });
    }

    let refs = tokens
        .into_iter()
        .map(|token| parse_face_ref(token, line, lens))
        .collect::<ObjResult<Vec<_>>>()?;

    let textured = refs.iter().filter(|r| r.texture.is_some()).count();
    if textured != 0 && textured != refs.len() {
        return Err(ObjError::MixedAttributes {
            line,
            kind: AttributeKind::Texture,
        });
    }
    let lit = refs.iter().filter(|r| r.normal.is_some()).count();
    if lit != 0 && lit != refs.len() {
        return Err(ObjError::MixedAttributes {
            line,
            kind: AttributeKind::Normal,
        });
    }

    Ok(Face { refs })
}

fn parse_face_ref(token: &str, line: usize, lens: TableLens) -> ObjResult<FaceRef> {
    let mut split = token.split('/');
    let vertex = match split.next() {
        Some(value) if !value.is_empty() => to_offset(value, AttributeKind::Vertex, line, lens)?,
        _ => {
            return Err(ObjError::MissingComponent {
                line,
                what: "vertex index",
            });
        }
    };

    let texture = match split.next() {
        Some(value) if !value.is_empty() => {
            Some(to_offset(value, AttributeKind::Texture, line, lens)?)
        }
        _ => None,
    };

    let normal = match split.next() {
        Some(value) if !value.is_empty() => {
            Some(to_offset(value, AttributeKind::Normal, line, lens)?)
        }
        _ => None,
    };

    Ok(FaceRef {
        vertex,
        texture,
        normal,
    })
}

/// `n` -> `n - 1`; `-n` -> `len - n`. Zero and negatives reaching past the
/// start of the table are rejected here; positive overflow is left to the
/// bounds check at emission time.
fn to_offset(token: &str, kind: AttributeKind, line: usize, lens: TableLens) -> ObjResult<usize> {
    let raw = token.parse::<i64>().map_err(|_| ObjError::MalformedNumber {
        line,
        token: token.to_owned(),
    })?;
    let len = lens.of(kind);
    let out_of_range = || ObjError::IndexOutOfRange {
        line,
        kind,
        index: raw,
        len,
    };

    if raw > 0 {
        usize::try_from(raw - 1).map_err(|_| out_of_range())
    } else if raw < 0 {
        let back = usize::try_from(raw.unsigned_abs()).map_err(|_| out_of_range())?;
        len.checked_sub(back).ok_or_else(out_of_range)
    } else {
        Err(out_of_range())
    }
}

fn required_f32(token: Option<&str>, line: usize, what: &'static str) -> ObjResult<f32> {
    let token = token.ok_or(ObjError::MissingComponent { line, what })?;
    parse_f32(token, line)
}

fn optional_f32(token: Option<&str>, line: usize) -> ObjResult<Option<f32>> {
    token.map(|t| parse_f32(t, line)).transpose()
}

fn parse_f32(token: &str, line: usize) -> ObjResult<f32> {
    token.parse::<f32>().map_err(|_| ObjError::MalformedNumber {
        line,
        token: token.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ObjResult<Record> {
        parse_record(line, 1, &ObjOptions::default(), TableLens::default())
    }

    fn face(line: &str) -> Face {
        match parse(line).expect("face line") {
            Record::Face(face) => face,
            other => panic!("expected face, got {other:?}"),
        }
    }

    #[test]
    fn vertex_with_optional_w() {
        assert_eq!(
            parse("v 1 2 3").unwrap(),
            Record::Vertex(Vertex {
                position: [1.0, 2.0, 3.0],
                w: 1.0
            })
        );
        assert_eq!(
            parse("v 1 2 3 0.5").unwrap(),
            Record::Vertex(Vertex {
                position: [1.0, 2.0, 3.0],
                w: 0.5
            })
        );
    }

    #[test]
    fn vertex_missing_z_is_reported() {
        assert_eq!(
            parse("v 1 2").unwrap_err(),
            ObjError::MissingComponent {
                line: 1,
                what: "z coordinate"
            }
        );
    }

    #[test]
    fn malformed_float_keeps_token() {
        assert_eq!(
            parse("vn 0 1.0.0 0").unwrap_err(),
            ObjError::MalformedNumber {
                line: 1,
                token: "1.0.0".into()
            }
        );
    }

    #[test]
    fn texture_components_default_to_zero() {
        let Record::TexCoord(tc) = parse("vt 0.25").unwrap() else {
            panic!("expected texcoord");
        };
        assert_eq!(tc.v, None);
        assert_eq!(tc.to_array(), [0.25, 0.0, 0.0]);
    }

    #[test]
    fn texture_limit_drops_extra_components() {
        let opts = ObjOptions::with_texture_components(2);
        let rec = parse_record("vt 0.1 0.2 0.3", 1, &opts, TableLens::default()).unwrap();
        let Record::TexCoord(tc) = rec else {
            panic!("expected texcoord");
        };
        assert_eq!(tc.to_array(), [0.1, 0.2, 0.0]);
    }

    #[test]
    fn texture_limit_is_clamped() {
        assert_eq!(ObjOptions::with_texture_components(0).max_texture_components, 1);
        assert_eq!(ObjOptions::with_texture_components(9).max_texture_components, 3);
    }

    #[test]
    fn unknown_keywords_are_ignored() {
        assert_eq!(parse("usemtl shiny").unwrap(), Record::Ignored);
        assert_eq!(parse("s off").unwrap(), Record::Ignored);
    }

    #[test]
    fn face_refs_are_zero_based_with_optional_segments() {
        let plain = face("f 1 2 3");
        assert_eq!(
            plain.refs()[0],
            FaceRef {
                vertex: 0,
                texture: None,
                normal: None
            }
        );

        let textured = face("f 1/5 2/5 3/5");
        assert_eq!(textured.refs()[1].vertex, 1);
        assert_eq!(textured.refs()[1].texture, Some(4));
        assert_eq!(textured.refs()[1].normal, None);

        let lit = face("f 1//7 2//7 3//7");
        assert_eq!(lit.refs()[2].vertex, 2);
        assert_eq!(lit.refs()[2].texture, None);
        assert_eq!(lit.refs()[2].normal, Some(6));

        let trailing = face("f 1/ 2/ 3/");
        assert!(trailing.refs().iter().all(|r| r.texture.is_none() && r.normal.is_none()));
    }

    #[test]
    fn arity_is_checked_before_index_tokens() {
        assert_eq!(
            parse("f 1 2 0 3 1").unwrap_err(),
            ObjError::InvalidFaceArity { line: 1, count: 5 }
        );
        assert_eq!(
            parse("f 1 x").unwrap_err(),
            ObjError::InvalidFaceArity { line: 1, count: 2 }
        );
    }

    #[test]
    fn mixed_textures_within_a_face_are_rejected() {
        assert_eq!(
            parse("f 1/1 2 3/1").unwrap_err(),
            ObjError::MixedAttributes {
                line: 1,
                kind: AttributeKind::Texture
            }
        );
    }

    #[test]
    fn quad_fans_from_first_corner() {
        let f = face("f 1 2 3 4");
        let tris: Vec<[usize; 3]> = f.triangles().map(|t| t.map(|r| r.vertex)).collect();
        assert_eq!(tris, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn face_arity_outside_three_or_four_fails() {
        for (line, count) in [("f", 0), ("f 1 2", 2), ("f 1 2 3 4 5", 5)] {
            assert_eq!(
                parse(line).unwrap_err(),
                ObjError::InvalidFaceArity { line: 1, count }
            );
        }
    }

    #[test]
    fn relative_indices_count_back_from_table_end() {
        let lens = TableLens {
            vertices: 4,
            textures: 0,
            normals: 2,
        };
        let rec = parse_record("f -1//-1 -2//-2 -4//-1", 1, &ObjOptions::default(), lens).unwrap();
        let Record::Face(f) = rec else {
            panic!("expected face");
        };
        let verts: Vec<usize> = f.refs().iter().map(|r| r.vertex).collect();
        assert_eq!(verts, vec![3, 2, 0]);
        assert_eq!(f.refs()[1].normal, Some(0));
    }

    #[test]
    fn zero_and_underflowing_indices_fail() {
        assert_eq!(
            parse("f 0 1 2").unwrap_err(),
            ObjError::IndexOutOfRange {
                line: 1,
                kind: AttributeKind::Vertex,
                index: 0,
                len: 0
            }
        );
        assert!(matches!(
            parse("f -1 1 2").unwrap_err(),
            ObjError::IndexOutOfRange { index: -1, .. }
        ));
    }

    #[test]
    fn mixed_normals_within_a_face_are_rejected() {
        assert_eq!(
            parse("f 1//1 2 3//1").unwrap_err(),
            ObjError::MixedAttributes {
                line: 1,
                kind: AttributeKind::Normal
            }
        );
    }

    #[test]
    fn malformed_index_is_reported() {
        assert_eq!(
            parse("f 1 two 3").unwrap_err(),
            ObjError::MalformedNumber {
                line: 1,
                token: "two".into()
            }
        );
    }
}
