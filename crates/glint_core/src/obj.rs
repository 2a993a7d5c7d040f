//! Wavefront OBJ loading.
//!
//! Files are read with `tobj` and only geometry is kept: the positions and
//! triangulated faces of every model are merged into one mesh. Texture
//! coordinates, normals and materials are dropped.
//!
//! A face that references a vertex that does not exist fails the whole
//! load; callers never see a partially built mesh.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glint_math::Vec3;
use thiserror::Error;

use crate::mesh::Mesh;

/// Errors that can occur while reading an OBJ file.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ error: {0}")]
    Obj(#[from] tobj::LoadError),
}

pub type MeshResult<T> = Result<T, MeshError>;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Load a mesh from an OBJ file on disk.
pub fn load_obj(path: impl AsRef<Path>) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let mesh = read_obj(&mut reader)?;

    log::debug!(
        "Loaded mesh {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

/// Parse OBJ text into a mesh.
pub fn parse_obj(source: &str) -> MeshResult<Mesh> {
    read_obj(&mut source.as_bytes())
}

fn read_obj(reader: &mut impl BufRead) -> MeshResult<Mesh> {
    // Materials are never used, so `mtllib` references are not followed
    let (models, _materials) =
        tobj::load_obj_buf(reader, &load_options(), |_| Err(tobj::LoadError::OpenFileFailed))?;

    Ok(merge_models(&models))
}

/// Concatenate models into one mesh, offsetting each model's indices.
fn merge_models(models: &[tobj::Model]) -> Mesh {
    let mut positions = Vec::new();
    let mut indices = Vec::new();

    for model in models {
        let offset = positions.len() as u32;
        positions.extend(
            model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
        );
        indices.extend(model.mesh.indices.iter().map(|&i| offset + i));
    }

    Mesh::new(positions, indices)
}
