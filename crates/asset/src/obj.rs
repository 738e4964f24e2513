//! OBJ parser supporting positions, normals and texture coordinates.
//!
//! Faces must be triangles or quads; quads are split as `(0,1,2)` and
//! `(0,2,3)`. Every reference is resolved against the attribute tables as
//! they stand when the face is read.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result};

use crate::{
    error::{AttributeKind, ObjError, ObjResult},
    geometry::{Geometry, IndexedGeometry},
    record::{Face, FaceRef, Normal, ObjOptions, Record, TableLens, TexCoord, Vertex, parse_record},
};

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<Geometry> {
    load_obj_from_path_with(path, &ObjOptions::default())
}

/// Load an OBJ mesh from a file path with explicit parser options.
pub fn load_obj_from_path_with(path: impl AsRef<Path>, options: &ObjOptions) -> Result<Geometry> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open OBJ file: {}", path.display()))?;
    let contents = read_source(BufReader::new(file))
        .with_context(|| format!("Failed to read OBJ file: {}", path.display()))?;
    let geometry = parse_obj_with(&contents, options)
        .with_context(|| format!("Failed to parse OBJ file: {}", path.display()))?;
    log_loaded(&path.display().to_string(), &geometry);
    Ok(geometry)
}

/// Load an OBJ mesh from any [`Read`] implementation.
pub fn load_obj_from_reader<R: Read>(reader: R) -> Result<Geometry> {
    load_obj_from_reader_with(reader, &ObjOptions::default())
}

pub fn load_obj_from_reader_with<R: Read>(reader: R, options: &ObjOptions) -> Result<Geometry> {
    let contents = read_source(reader)?;
    load_obj_from_str_with(&contents, options)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<Geometry> {
    load_obj_from_str_with(contents, &ObjOptions::default())
}

pub fn load_obj_from_str_with(contents: &str, options: &ObjOptions) -> Result<Geometry> {
    let geometry = parse_obj_with(contents, options).context("Failed to parse OBJ source")?;
    log_loaded("OBJ source", &geometry);
    Ok(geometry)
}

fn read_source<R: Read>(mut reader: R) -> Result<String> {
    let mut contents = String::new();
    reader
        .read_to_string(&mut contents)
        .context("Failed to read OBJ source")?;
    Ok(contents)
}

fn log_loaded(source: &str, geometry: &Geometry) {
    log::info!(
        "Loaded {} ({} triangles, normals={}, texcoords={})",
        source,
        geometry.triangle_count(),
        geometry.has_normals(),
        geometry.has_texcoords()
    );
}

/// Parse OBJ text with default options.
pub fn parse_obj(contents: &str) -> ObjResult<Geometry> {
    parse_obj_with(contents, &ObjOptions::default())
}

/// Parse OBJ text into flat per-corner streams.
pub fn parse_obj_with(contents: &str, options: &ObjOptions) -> ObjResult<Geometry> {
    let mut out = Geometry::default();

    let tables = walk(contents, options, |tables, line, face| {
        for tri in face.triangles() {
            for corner in tri {
                out.vertices.extend_from_slice(&tables.vertex(corner, line)?.position);
                if let Some(normal) = tables.normal(corner, line)? {
                    out.normals.extend_from_slice(&normal.direction);
                }
                if let Some(tex) = tables.texture(corner, line)? {
                    out.texcoords.extend_from_slice(&tex.to_array());
                }
            }
        }
        Ok(())
    })?;

    log::debug!(
        "OBJ parsed: {} vertices, {} texcoords, {} normals -> {} triangles",
        tables.vertices.len(),
        tables.textures.len(),
        tables.normals.len(),
        out.triangle_count()
    );
    Ok(out)
}

/// Parse OBJ text into a position table and triangle indices.
///
/// Texture and normal references are still bounds-checked, but not emitted.
pub fn parse_obj_indexed(contents: &str) -> ObjResult<IndexedGeometry> {
    let mut indices: Vec<u32> = Vec::new();

    let tables = walk(contents, &ObjOptions::default(), |tables, line, face| {
        for tri in face.triangles() {
            for corner in tri {
                tables.vertex(corner, line)?;
                tables.normal(corner, line)?;
                tables.texture(corner, line)?;
                let index = u32::try_from(corner.vertex).map_err(|_| ObjError::IndexOutOfRange {
                    line,
                    kind: AttributeKind::Vertex,
                    index: written(corner.vertex),
                    len: tables.vertices.len(),
                })?;
                indices.push(index);
            }
        }
        Ok(())
    })?;

    let positions = tables.vertices.iter().flat_map(|v| v.position).collect();
    Ok(IndexedGeometry { positions, indices })
}

/// Attribute tables, append-only in file order.
#[derive(Default)]
struct Tables {
    vertices: Vec<Vertex>,
    textures: Vec<TexCoord>,
    normals: Vec<Normal>,
}

impl Tables {
    fn lens(&self) -> TableLens {
        TableLens {
            vertices: self.vertices.len(),
            textures: self.textures.len(),
            normals: self.normals.len(),
        }
    }

    fn vertex(&self, corner: FaceRef, line: usize) -> ObjResult<Vertex> {
        lookup(&self.vertices, corner.vertex, AttributeKind::Vertex, line)
    }

    fn texture(&self, corner: FaceRef, line: usize) -> ObjResult<Option<TexCoord>> {
        corner
            .texture
            .map(|i| lookup(&self.textures, i, AttributeKind::Texture, line))
            .transpose()
    }

    fn normal(&self, corner: FaceRef, line: usize) -> ObjResult<Option<Normal>> {
        corner
            .normal
            .map(|i| lookup(&self.normals, i, AttributeKind::Normal, line))
            .transpose()
    }
}

fn lookup<T: Copy>(table: &[T], offset: usize, kind: AttributeKind, line: usize) -> ObjResult<T> {
    table
        .get(offset)
        .copied()
        .ok_or(ObjError::IndexOutOfRange {
            line,
            kind,
            index: written(offset),
            len: table.len(),
        })
}

/// Zero-based offset back to the 1-based index as it appeared in the file.
fn written(offset: usize) -> i64 {
    i64::try_from(offset).map_or(i64::MAX, |o| o.saturating_add(1))
}

/// Single pass over the document: attribute rows go into the tables, faces
/// are handed to `on_face` together with their 1-based line number.
fn walk<F>(contents: &str, options: &ObjOptions, mut on_face: F) -> ObjResult<Tables>
where
    F: FnMut(&Tables, usize, &Face) -> ObjResult<()>,
{
    let mut tables = Tables::default();

    for (line_no, raw) in contents.lines().enumerate() {
        let line = line_no + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_record(trimmed, line, options, tables.lens())? {
            Record::Vertex(v) => tables.vertices.push(v),
            Record::TexCoord(t) => tables.textures.push(t),
            Record::Normal(n) => tables.normals.push(n),
            Record::Face(face) => on_face(&tables, line, &face)?,
            Record::Ignored => {
                // Ignore other directives (o/g/s/usemtl/etc.)
            }
        }
    }

    Ok(tables)
}
