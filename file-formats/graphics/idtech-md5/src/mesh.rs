//! `.md5mesh` mesh blocks and bind-pose construction.
//!
//! A mesh block holds a shader name, vertices (UV plus a range into the
//! weight list), triangles, and weights (joint index, bias, joint-local
//! offset). Vertices carry no positions in the file; the bind pose is
//! derived after parsing by pushing every weight through its joint's
//! bind transform. Smooth normals are then accumulated from triangle
//! faces and everything is packed into a 16-float-per-vertex buffer
//! ready for a vertex-attribute upload.

use glam::{Vec3, Vec4};
use log::{debug, warn};

use crate::error::{Md5Error, Result};
use crate::tokenizer::TextCursor;
use crate::types::{Joint, MAX_VERTEX_WEIGHTS, Triangle, VERTEX_STRIDE, Vertex, Weight};

/// One skinned mesh of a model
#[derive(Debug, Clone, Default)]
pub struct Md5Mesh {
    pub(crate) shader: String,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) triangles: Vec<Triangle>,
    pub(crate) weights: Vec<Weight>,
    pub(crate) vertex_data: Vec<f32>,
    pub(crate) index_data: Vec<u32>,
}

impl Md5Mesh {
    /// Parses one `mesh { ... }` block, the opening directive already
    /// consumed, and builds the bind pose against `joints`.
    pub(crate) fn parse(cursor: &mut TextCursor<'_>, joints: &[Joint]) -> Result<Self> {
        let mut shader = String::new();
        let mut vertices: Option<Vec<Vertex>> = None;
        let mut triangles: Option<Vec<Triangle>> = None;
        let mut weights: Option<Vec<Weight>> = None;
        let mut vert_entries = 0usize;
        let mut tri_entries = 0usize;
        let mut weight_entries = 0usize;

        loop {
            let mut line = cursor.block_line("mesh")?;
            if line.closes_block() {
                break;
            }
            let Some(key) = line.next_token() else {
                continue;
            };
            match key {
                "shader" => {
                    let value = line.expect_token("shader name")?;
                    // The diffuse texture is always the shader name plus .tga.
                    shader = format!("{value}.tga");
                }
                "numverts" => {
                    vertices = Some(vec![Vertex::default(); line.next_usize("numverts")?]);
                }
                "vert" => {
                    let list = vertices.as_mut().ok_or(Md5Error::UnsizedCollection {
                        entry: "vert",
                        directive: "numverts",
                        line: line.line(),
                    })?;
                    let index = line.next_usize("vertex index")?;
                    if index >= list.len() {
                        return Err(Md5Error::MalformedBlock {
                            block: "mesh",
                            line: line.line(),
                            reason: format!(
                                "vertex index {index} out of range (numverts {})",
                                list.len()
                            ),
                        });
                    }
                    let uv = line.vec2("vertex texture coordinate")?;
                    let start_weight = line.next_usize("vertex start weight")?;
                    let count_weight = line.next_usize("vertex weight count")?;
                    list[index] = Vertex {
                        uv,
                        start_weight,
                        count_weight,
                        ..Vertex::default()
                    };
                    vert_entries += 1;
                }
                "numtris" => {
                    triangles = Some(vec![Triangle::default(); line.next_usize("numtris")?]);
                }
                "tri" => {
                    let list = triangles.as_mut().ok_or(Md5Error::UnsizedCollection {
                        entry: "tri",
                        directive: "numtris",
                        line: line.line(),
                    })?;
                    let index = line.next_usize("triangle index")?;
                    if index >= list.len() {
                        return Err(Md5Error::MalformedBlock {
                            block: "mesh",
                            line: line.line(),
                            reason: format!(
                                "triangle index {index} out of range (numtris {})",
                                list.len()
                            ),
                        });
                    }
                    let a = line.next_u32("triangle vertex")?;
                    let b = line.next_u32("triangle vertex")?;
                    let c = line.next_u32("triangle vertex")?;
                    list[index] = Triangle { indices: [a, b, c] };
                    tri_entries += 1;
                }
                "numweights" => {
                    weights = Some(vec![Weight::default(); line.next_usize("numweights")?]);
                }
                "weight" => {
                    let list = weights.as_mut().ok_or(Md5Error::UnsizedCollection {
                        entry: "weight",
                        directive: "numweights",
                        line: line.line(),
                    })?;
                    let index = line.next_usize("weight index")?;
                    if index >= list.len() {
                        return Err(Md5Error::MalformedBlock {
                            block: "mesh",
                            line: line.line(),
                            reason: format!(
                                "weight index {index} out of range (numweights {})",
                                list.len()
                            ),
                        });
                    }
                    let joint = line.next_usize("weight joint")?;
                    let bias = line.next_f32("weight bias")?;
                    let position = line.vec3("weight position")?;
                    list[index] = Weight {
                        joint,
                        bias,
                        position,
                    };
                    weight_entries += 1;
                }
                _ => {}
            }
        }

        let vertices = vertices.unwrap_or_default();
        let triangles = triangles.unwrap_or_default();
        let weights = weights.unwrap_or_default();
        check_entry_count("vert", vert_entries, vertices.len(), cursor)?;
        check_entry_count("tri", tri_entries, triangles.len(), cursor)?;
        check_entry_count("weight", weight_entries, weights.len(), cursor)?;

        let mut mesh = Self {
            shader,
            vertices,
            triangles,
            weights,
            vertex_data: Vec::new(),
            index_data: Vec::new(),
        };
        mesh.check_ranges(joints.len(), cursor.line_number())?;
        mesh.compute_vertices(joints);
        mesh.compute_indices();
        mesh.compute_normals(joints);
        mesh.build_vertex_data();
        debug!(
            "parsed mesh `{}`: {} vertices, {} triangles, {} weights",
            mesh.shader,
            mesh.vertices.len(),
            mesh.triangles.len(),
            mesh.weights.len()
        );
        Ok(mesh)
    }

    /// Rejects index ranges that would make later per-tick skinning reach
    /// outside its buffers.
    fn check_ranges(&self, joint_count: usize, line: usize) -> Result<()> {
        for (index, weight) in self.weights.iter().enumerate() {
            if weight.joint >= joint_count {
                return Err(Md5Error::MalformedBlock {
                    block: "mesh",
                    line,
                    reason: format!(
                        "weight {index} references joint {} beyond numJoints {joint_count}",
                        weight.joint
                    ),
                });
            }
        }
        for (index, vertex) in self.vertices.iter().enumerate() {
            if vertex.start_weight + vertex.count_weight > self.weights.len() {
                return Err(Md5Error::MalformedBlock {
                    block: "mesh",
                    line,
                    reason: format!(
                        "vertex {index} weight range {}..{} beyond numweights {}",
                        vertex.start_weight,
                        vertex.start_weight + vertex.count_weight,
                        self.weights.len()
                    ),
                });
            }
        }
        for (index, triangle) in self.triangles.iter().enumerate() {
            for &vertex in &triangle.indices {
                if vertex as usize >= self.vertices.len() {
                    return Err(Md5Error::MalformedBlock {
                        block: "mesh",
                        line,
                        reason: format!(
                            "triangle {index} references vertex {vertex} beyond numverts {}",
                            self.vertices.len()
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Resolves bind positions from weighted joint influences and packs the
    /// per-vertex GPU influence slots.
    fn compute_vertices(&mut self, joints: &[Joint]) {
        let weights = &self.weights;
        let mut capped = 0usize;
        for vertex in &mut self.vertices {
            let range = &weights[vertex.start_weight..vertex.start_weight + vertex.count_weight];
            let mut position = Vec3::ZERO;
            for weight in range {
                let joint = &joints[weight.joint];
                position += (joint.position + joint.orientation * weight.position) * weight.bias;
            }
            vertex.bind_position = position;

            let mut influences: Vec<Weight> = range.to_vec();
            if influences.len() > MAX_VERTEX_WEIGHTS {
                influences.sort_by(|a, b| b.bias.total_cmp(&a.bias));
                influences.truncate(MAX_VERTEX_WEIGHTS);
                let total: f32 = influences.iter().map(|weight| weight.bias).sum();
                if total > 0.0 {
                    for weight in &mut influences {
                        weight.bias /= total;
                    }
                }
                capped += 1;
            }
            let mut bone_weights = Vec4::ZERO;
            let mut bone_indices = Vec4::ZERO;
            for (slot, weight) in influences.iter().enumerate() {
                bone_weights[slot] = weight.bias;
                bone_indices[slot] = weight.joint as f32;
            }
            vertex.bone_weights = bone_weights;
            vertex.bone_indices = bone_indices;
        }
        if capped > 0 {
            warn!(
                "mesh `{}`: capped {capped} vertices to {MAX_VERTEX_WEIGHTS} joint influences",
                self.shader
            );
        }
    }

    /// Flattens triangles into the index buffer
    fn compute_indices(&mut self) {
        self.index_data.clear();
        self.index_data.reserve(self.triangles.len() * 3);
        for triangle in &self.triangles {
            self.index_data.extend_from_slice(&triangle.indices);
        }
    }

    /// Accumulates face normals into smooth per-vertex bind normals, then
    /// pre-rotates each into joint-local space for CPU re-skinning.
    fn compute_normals(&mut self, joints: &[Joint]) {
        for vertex in &mut self.vertices {
            vertex.bind_normal = Vec3::ZERO;
        }
        for triangle in &self.triangles {
            let [i0, i1, i2] = triangle.indices.map(|index| index as usize);
            let v0 = self.vertices[i0].bind_position;
            let v1 = self.vertices[i1].bind_position;
            let v2 = self.vertices[i2].bind_position;
            let face = (v2 - v0).cross(v1 - v0);
            self.vertices[i0].bind_normal += face;
            self.vertices[i1].bind_normal += face;
            self.vertices[i2].bind_normal += face;
        }
        let weights = &self.weights;
        for vertex in &mut self.vertices {
            vertex.bind_normal = vertex.bind_normal.normalize_or_zero();
            let mut joint_normal = Vec3::ZERO;
            for weight in &weights[vertex.start_weight..vertex.start_weight + vertex.count_weight] {
                let joint = &joints[weight.joint];
                // Into joint-local space, so runtime skinning can rotate it
                // back out with the live orientation.
                joint_normal += (joint.orientation.conjugate() * vertex.bind_normal) * weight.bias;
            }
            vertex.joint_normal = joint_normal;
        }
    }

    /// Packs the interleaved vertex buffer from the bind pose
    fn build_vertex_data(&mut self) {
        self.vertex_data.clear();
        self.vertex_data.reserve(self.vertices.len() * VERTEX_STRIDE);
        for vertex in &self.vertices {
            self.vertex_data
                .extend_from_slice(&vertex.bind_position.to_array());
            self.vertex_data
                .extend_from_slice(&vertex.bind_normal.to_array());
            self.vertex_data.extend_from_slice(&vertex.uv.to_array());
            self.vertex_data
                .extend_from_slice(&vertex.bone_weights.to_array());
            self.vertex_data
                .extend_from_slice(&vertex.bone_indices.to_array());
        }
    }

    /// Diffuse texture identifier: the shader name with `.tga` appended
    pub fn shader(&self) -> &str {
        &self.shader
    }

    /// Parsed vertices with their derived bind-pose data
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Parsed triangles
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Parsed weights
    pub fn weights(&self) -> &[Weight] {
        &self.weights
    }

    /// Packed vertex buffer, [`VERTEX_STRIDE`] floats per vertex
    pub fn vertex_data(&self) -> &[f32] {
        &self.vertex_data
    }

    /// Flattened triangle indices
    pub fn index_data(&self) -> &[u32] {
        &self.index_data
    }
}

fn check_entry_count(
    entry: &'static str,
    found: usize,
    declared: usize,
    cursor: &TextCursor<'_>,
) -> Result<()> {
    if found == declared {
        Ok(())
    } else {
        Err(Md5Error::MalformedBlock {
            block: "mesh",
            line: cursor.line_number(),
            reason: format!("expected {declared} {entry} entries, found {found}"),
        })
    }
}
