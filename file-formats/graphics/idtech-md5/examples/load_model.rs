//! Example: Load an MD5 model and inspect its data
//!
//! This example shows how to load a `.md5mesh` file and walk its joints,
//! meshes, and prepared vertex buffers.
//!
//! Usage: cargo run --example load_model -- <path_to_md5mesh_file>

use idtech_md5::{Md5Model, VERTEX_STRIDE};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <path_to_md5mesh_file>", args[0]);
        eprintln!("Example: {} models/imp/imp.md5mesh", args[0]);
        std::process::exit(1);
    }

    let mesh_path = &args[1];

    println!("Loading MD5 model from: {mesh_path}");
    let model = Md5Model::load(mesh_path)?;

    // ========================================
    // 1. BASIC MODEL DATA
    // ========================================
    println!("\n=== BASIC MODEL DATA ===");
    println!("Model name: {}", model.name());
    println!("Version: {}", model.version());
    println!("Joints: {} items", model.joints().len());
    println!("Meshes: {} items", model.meshes().len());

    // ========================================
    // 2. SKELETON
    // ========================================
    println!("\n=== SKELETON ===");
    for (index, joint) in model.joints().iter().enumerate() {
        let parent = match joint.parent_index() {
            Some(parent) => model.joints()[parent].name.as_str(),
            None => "<root>",
        };
        println!(
            "  [{index:2}] {:<24} parent {:<24} at ({:.2}, {:.2}, {:.2})",
            joint.name, parent, joint.position.x, joint.position.y, joint.position.z
        );
    }

    // ========================================
    // 3. MESH AND VERTEX BUFFERS
    // ========================================
    println!("\n=== MESH DATA ===");
    for (index, mesh) in model.meshes().iter().enumerate() {
        println!("Mesh {index}:");
        println!("  Shader: {}", mesh.shader());
        println!("  Vertices: {} items", mesh.vertices().len());
        println!("  Triangles: {} items", mesh.triangles().len());
        println!("  Weights: {} items", mesh.weights().len());
        println!(
            "  Vertex buffer: {} floats ({} per vertex)",
            mesh.vertex_data().len(),
            VERTEX_STRIDE
        );

        if let Some(chunk) = mesh.vertex_data().chunks(VERTEX_STRIDE).next() {
            println!("  First vertex:");
            println!(
                "    Position: ({:.2}, {:.2}, {:.2})",
                chunk[0], chunk[1], chunk[2]
            );
            println!(
                "    Normal:   ({:.2}, {:.2}, {:.2})",
                chunk[3], chunk[4], chunk[5]
            );
            println!("    UV:       ({:.2}, {:.2})", chunk[6], chunk[7]);
        }
    }

    // ========================================
    // 4. TEXTURE REFERENCES
    // ========================================
    println!("\n=== TEXTURE REFERENCES ===");
    for name in model.texture_names() {
        println!("  {name}");
    }

    Ok(())
}
