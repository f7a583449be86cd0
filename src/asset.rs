//! Scene import.
//!
//! Only the first object of a Wavefront OBJ file is used. Faces are triangulated and
//! positions are deduplicated into a single index stream.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use gltut_core::{MeshError, geometry::MeshData};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

fn first_mesh(models: Vec<tobj::Model>, origin: &str) -> Result<MeshData, MeshError> {
    let total = models.len();
    let Some(model) = models.into_iter().next() else {
        return Err(MeshError::Empty);
    };
    if total > 1 {
        log::debug!("{origin}: {total} objects, using only {:?}", model.name);
    }
    let mesh = MeshData::new(model.mesh.positions, model.mesh.indices)?;
    log::info!(
        "{origin}: {} vertices, {} indices",
        mesh.vertex_count(),
        mesh.index_count()
    );
    Ok(mesh)
}

/// Imports the first mesh of the OBJ file at `path`. Materials are ignored.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<MeshData, MeshError> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|err| MeshError::Import {
        path: origin.clone(),
        reason: err.to_string(),
    })?;
    read_mesh(&mut BufReader::new(file), &origin)
}

/// Imports the first mesh from OBJ text. `origin` names the source in errors and logs.
fn read_mesh(reader: &mut impl BufRead, origin: &str) -> Result<MeshData, MeshError> {
    let (models, _materials) =
        tobj::load_obj_buf(reader, &load_options(), |_| Ok(Default::default())).map_err(
            |err| MeshError::Import {
                path: origin.to_string(),
                reason: err.to_string(),
            },
        )?;
    first_mesh(models, origin)
}
