//! Greedy mesher
//!
//! Turns one chunk's voxels into triangle soup. Faces between two blocks
//! of the same transparency class are culled; coplanar faces that share a
//! material are merged into maximal rectangles. Neighbor lookups go
//! through the world so chunk borders mesh seamlessly, with anything
//! outside the world treated as air.

use bytemuck::{Pod, Zeroable};

use crate::core::error::Error;
use crate::core::types::{Result, Vec3};
use crate::math::aabb::Aabb;
use crate::world::block::{MaterialRegistry, Transparency};
use crate::world::chunk::{CHUNK_SIZE, ChunkCoord};
use crate::world::world::World;

/// One vertex of a chunk mesh, laid out for direct upload
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// Texture-array layer of the face's material
    pub layer: u32,
}

/// Triangle soup for one chunk, split by transparency class.
/// Both streams are unindexed, three vertices per triangle.
#[derive(Clone, Debug, Default)]
pub struct ChunkMesh {
    pub opaque: Vec<MeshVertex>,
    pub transparent: Vec<MeshVertex>,
    pub bounds: Aabb,
}

impl ChunkMesh {
    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.transparent.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }
}

/// Material identity of one exposed face within a mask slice
#[derive(Clone, Copy, PartialEq, Eq)]
struct FaceKey {
    layer: u32,
    transparent: bool,
}

const SLICE: usize = CHUNK_SIZE as usize;

/// Build the mesh for a loaded chunk.
///
/// Fails if the chunk is not resident; neighbor chunks may be missing,
/// their blocks then read as air and the border faces are emitted.
pub fn build_chunk_mesh(
    world: &World,
    coord: ChunkCoord,
    registry: &MaterialRegistry,
) -> Result<ChunkMesh> {
    if world.chunk(coord).is_none() {
        return Err(Error::Mesh(format!("chunk {:?} is not loaded", coord)));
    }

    let (ox, oy, oz) = coord.block_origin();
    let origin = [ox, oy, oz];
    let mut mesh = ChunkMesh::default();
    let mut mask: [Option<FaceKey>; SLICE * SLICE] = [None; SLICE * SLICE];

    // Sweep each axis in both directions, one 16x16 slice at a time
    for d in 0..3usize {
        let u = (d + 1) % 3;
        let v = (d + 2) % 3;
        for positive in [true, false] {
            let step = if positive { 1 } else { -1 };
            for layer in 0..CHUNK_SIZE {
                mask.fill(None);
                for j in 0..SLICE {
                    for i in 0..SLICE {
                        let mut local = [0i32; 3];
                        local[d] = layer;
                        local[u] = i as i32;
                        local[v] = j as i32;
                        let wx = origin[0] + local[0];
                        let wy = origin[1] + local[1];
                        let wz = origin[2] + local[2];

                        let own = world.block_at(wx, wy, wz);
                        let own_t = registry.transparency(own);
                        if own_t == Transparency::Empty {
                            continue;
                        }
                        let mut neighbor = [wx, wy, wz];
                        neighbor[d] += step;
                        let other_t = registry
                            .transparency(world.block_at(neighbor[0], neighbor[1], neighbor[2]));
                        if other_t == Transparency::Empty || other_t != own_t {
                            mask[j * SLICE + i] = Some(FaceKey {
                                layer: registry.get(own).texture_layer,
                                transparent: own_t == Transparency::Transparent,
                            });
                        }
                    }
                }
                merge_slice(&mut mask, &mut mesh, origin, d, u, v, layer, positive);
            }
        }
    }

    let points = mesh
        .opaque
        .iter()
        .chain(mesh.transparent.iter())
        .map(|vert| Vec3::from_array(vert.position));
    mesh.bounds =
        Aabb::from_points(points).unwrap_or_else(|| Aabb::point(coord.world_origin()));

    Ok(mesh)
}

/// Greedy maximal-rectangle merge over one mask slice, emitting quads
#[allow(clippy::too_many_arguments)]
fn merge_slice(
    mask: &mut [Option<FaceKey>; SLICE * SLICE],
    mesh: &mut ChunkMesh,
    origin: [i32; 3],
    d: usize,
    u: usize,
    v: usize,
    layer: i32,
    positive: bool,
) {
    for j in 0..SLICE {
        let mut i = 0;
        while i < SLICE {
            let Some(key) = mask[j * SLICE + i] else {
                i += 1;
                continue;
            };

            // Widen along u, then grow along v while every cell matches
            let mut w = 1;
            while i + w < SLICE && mask[j * SLICE + i + w] == Some(key) {
                w += 1;
            }
            let mut h = 1;
            'grow: while j + h < SLICE {
                for k in 0..w {
                    if mask[(j + h) * SLICE + i + k] != Some(key) {
                        break 'grow;
                    }
                }
                h += 1;
            }
            for dj in 0..h {
                for di in 0..w {
                    mask[(j + dj) * SLICE + i + di] = None;
                }
            }

            emit_quad(mesh, origin, d, u, v, layer, positive, i, j, w, h, key);
            i += w;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_quad(
    mesh: &mut ChunkMesh,
    origin: [i32; 3],
    d: usize,
    u: usize,
    v: usize,
    layer: i32,
    positive: bool,
    i: usize,
    j: usize,
    w: usize,
    h: usize,
    key: FaceKey,
) {
    // Positive faces sit on the far side of the cell
    let plane = if positive { layer + 1 } else { layer };

    let mut base = [0f32; 3];
    base[d] = (origin[d] + plane) as f32;
    base[u] = (origin[u] + i as i32) as f32;
    base[v] = (origin[v] + j as i32) as f32;

    let mut du = [0f32; 3];
    du[u] = w as f32;
    let mut dv = [0f32; 3];
    dv[v] = h as f32;

    let mut normal = [0f32; 3];
    normal[d] = if positive { 1.0 } else { -1.0 };

    let add = |a: &[f32; 3], b: &[f32; 3]| [a[0] + b[0], a[1] + b[1], a[2] + b[2]];
    let corner = |offset_u: bool, offset_v: bool| {
        let mut p = base;
        if offset_u {
            p = add(&p, &du);
        }
        if offset_v {
            p = add(&p, &dv);
        }
        MeshVertex {
            position: p,
            normal,
            uv: [
                if offset_u { w as f32 } else { 0.0 },
                if offset_v { h as f32 } else { 0.0 },
            ],
            layer: key.layer,
        }
    };

    let c00 = corner(false, false);
    let c10 = corner(true, false);
    let c11 = corner(true, true);
    let c01 = corner(false, true);

    // du x dv points along +d; flip winding for negative faces
    let verts: [MeshVertex; 6] = if positive {
        [c00, c10, c11, c00, c11, c01]
    } else {
        [c00, c11, c10, c00, c01, c11]
    };

    let stream = if key.transparent {
        &mut mesh.transparent
    } else {
        &mut mesh.opaque
    };
    stream.extend_from_slice(&verts);
}

/// A mesh is valid when both streams are whole triangles and every
/// coordinate is finite.
pub fn validate(mesh: &ChunkMesh) -> bool {
    if mesh.opaque.len() % 3 != 0 || mesh.transparent.len() % 3 != 0 {
        return false;
    }
    mesh.opaque
        .iter()
        .chain(mesh.transparent.iter())
        .all(|v| v.position.iter().all(|c| c.is_finite()))
}
