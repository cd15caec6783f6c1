//! MD5 model and animation command implementations

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use humansize::{DECIMAL, format_size};
use std::fs;
use std::path::{Path, PathBuf};

use idtech_md5::{
    ANIM_EXTENSION, Joint, JointInfo, MESH_EXTENSION, Md5Animation, Md5Error, Md5Model,
};

use crate::utils::{
    NodeType, TreeNode, TreeOptions, add_table_row, create_table, detect_ref_type, render_tree,
};

#[derive(Subcommand)]
pub enum Md5Commands {
    /// Display information about a model or animation file
    Info {
        /// Path to the .md5mesh or .md5anim file
        file: PathBuf,

        /// Show joint and mesh tables
        #[arg(short, long)]
        detailed: bool,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Attach animations to a model and report compatibility
    Anims {
        /// Path to the .md5mesh file
        model: PathBuf,

        /// Paths to .md5anim files to attach
        animations: Vec<PathBuf>,
    },

    /// Display the joint hierarchy as a tree
    Tree {
        /// Path to the .md5mesh or .md5anim file
        file: PathBuf,

        /// Maximum depth to display
        #[arg(long)]
        depth: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Show compact metadata inline
        #[arg(long)]
        compact: bool,
    },

    /// Check a file for structural problems
    Validate {
        /// Path to the .md5mesh or .md5anim file
        file: PathBuf,
    },
}

pub fn execute(command: Md5Commands) -> Result<()> {
    match command {
        Md5Commands::Info {
            file,
            detailed,
            json,
        } => handle_info(file, detailed, json),
        Md5Commands::Anims { model, animations } => handle_anims(model, animations),
        Md5Commands::Tree {
            file,
            depth,
            no_color,
            compact,
        } => handle_tree(file, depth, no_color, compact),
        Md5Commands::Validate { file } => handle_validate(file),
    }
}

/// File kind as decided by the format suffix
enum FileKind {
    Mesh,
    Anim,
}

fn detect_kind(path: &Path) -> Result<FileKind> {
    let text = path.to_string_lossy();
    if text.len() > MESH_EXTENSION.len() && text.ends_with(MESH_EXTENSION) {
        Ok(FileKind::Mesh)
    } else if text.len() > ANIM_EXTENSION.len() && text.ends_with(ANIM_EXTENSION) {
        Ok(FileKind::Anim)
    } else {
        bail!(
            "Unrecognized file type: {} (expected a .{MESH_EXTENSION} or .{ANIM_EXTENSION} path)",
            path.display()
        )
    }
}

fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|meta| meta.len()).unwrap_or(0)
}

fn handle_info(file: PathBuf, detailed: bool, json: bool) -> Result<()> {
    match detect_kind(&file)? {
        FileKind::Mesh => model_info(&file, detailed, json),
        FileKind::Anim => animation_info(&file, detailed, json),
    }
}

fn model_info(path: &Path, detailed: bool, json: bool) -> Result<()> {
    use console::style;

    let model = Md5Model::load(path)
        .with_context(|| format!("Failed to load model from {}", path.display()))?;
    let summary = model.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", style("MD5 Model Information").bold().cyan());
    println!("{}", style("=====================").cyan());
    println!();
    println!("{}: {}", style("File").bold(), path.display());
    println!(
        "{}: {}",
        style("Size").bold(),
        format_size(file_size(path), DECIMAL)
    );
    println!("{}: {}", style("Version").bold(), model.version());
    println!("{}: {}", style("Joints").bold(), summary.joint_count);
    println!("{}: {}", style("Meshes").bold(), summary.mesh_count);
    println!("{}: {}", style("Vertices").bold(), summary.vertex_count);
    println!("{}: {}", style("Triangles").bold(), summary.triangle_count);
    println!("{}: {}", style("Weights").bold(), summary.weight_count);

    if !summary.shaders.is_empty() {
        println!();
        println!("{}", style("Shaders:").bold());
        for shader in &summary.shaders {
            println!("  {} {}", style("•").cyan(), shader);
        }
    }

    if detailed {
        println!();
        println!("{}", style("Joints:").bold());
        let mut table = create_table(&["Index", "Name", "Parent", "Position"]);
        for (index, joint) in model.joints().iter().enumerate() {
            let parent = match joint.parent_index() {
                Some(parent) => model.joints()[parent].name.clone(),
                None => "<root>".to_string(),
            };
            add_table_row(
                &mut table,
                &[
                    index.to_string(),
                    joint.name.clone(),
                    parent,
                    format!(
                        "({:.2}, {:.2}, {:.2})",
                        joint.position.x, joint.position.y, joint.position.z
                    ),
                ],
            );
        }
        table.printstd();

        println!();
        println!("{}", style("Meshes:").bold());
        let mut table = create_table(&["Mesh", "Shader", "Vertices", "Triangles", "Weights"]);
        for (index, mesh) in model.meshes().iter().enumerate() {
            add_table_row(
                &mut table,
                &[
                    index.to_string(),
                    mesh.shader().to_string(),
                    mesh.vertices().len().to_string(),
                    mesh.triangles().len().to_string(),
                    mesh.weights().len().to_string(),
                ],
            );
        }
        table.printstd();
    }

    Ok(())
}

fn animation_info(path: &Path, detailed: bool, json: bool) -> Result<()> {
    use console::style;

    let animation = Md5Animation::load(path)
        .with_context(|| format!("Failed to load animation from {}", path.display()))?;
    let summary = animation.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", style("MD5 Animation Information").bold().cyan());
    println!("{}", style("=========================").cyan());
    println!();
    println!("{}: {}", style("File").bold(), path.display());
    println!(
        "{}: {}",
        style("Size").bold(),
        format_size(file_size(path), DECIMAL)
    );
    println!("{}: {}", style("Version").bold(), animation.version());
    println!("{}: {}", style("Frames").bold(), summary.frame_count);
    println!("{}: {} fps", style("Frame Rate").bold(), summary.frame_rate);
    println!(
        "{}: {:.2} s",
        style("Duration").bold(),
        summary.duration_seconds
    );
    println!("{}: {}", style("Joints").bold(), summary.joint_count);
    println!(
        "{}: {} per frame",
        style("Components").bold(),
        summary.component_count
    );

    if let Some((min, max)) = summary.first_bound {
        println!(
            "{}: ({:.1}, {:.1}, {:.1}) to ({:.1}, {:.1}, {:.1})",
            style("First Bound").bold(),
            min[0],
            min[1],
            min[2],
            max[0],
            max[1],
            max[2],
        );
    }

    if detailed {
        println!();
        println!("{}", style("Hierarchy:").bold());
        let mut table = create_table(&["Index", "Name", "Parent", "Flags", "Components"]);
        for (index, info) in animation.joint_infos().iter().enumerate() {
            add_table_row(
                &mut table,
                &[
                    index.to_string(),
                    info.name.clone(),
                    info.parent.to_string(),
                    format!("0x{:02X}", info.flags.bits()),
                    info.flags.component_count().to_string(),
                ],
            );
        }
        table.printstd();
    }

    Ok(())
}

fn handle_anims(model_path: PathBuf, animation_paths: Vec<PathBuf>) -> Result<()> {
    use console::style;

    let mut model = Md5Model::load(&model_path)
        .with_context(|| format!("Failed to load model from {}", model_path.display()))?;

    println!("{}", style("Animation Compatibility").bold().cyan());
    println!("{}", style("=======================").cyan());
    println!();
    println!(
        "{}: {} ({} joints)",
        style("Model").bold(),
        model.name(),
        model.joints().len()
    );
    println!();

    let mut table = create_table(&["Animation", "Frames", "Rate", "Duration", "Compatible"]);

    for path in &animation_paths {
        match Md5Animation::load(path) {
            Ok(animation) => {
                let summary = animation.summary();
                let verdict = match model.add_animation(animation) {
                    Ok(slot) => format!("{} (slot {slot})", style("✓").green()),
                    Err(Md5Error::IncompatibleAnimation { reason, .. }) => {
                        format!("{} {reason}", style("✗").red())
                    }
                    Err(error) => format!("{} {error}", style("✗").red()),
                };
                add_table_row(
                    &mut table,
                    &[
                        summary.name,
                        summary.frame_count.to_string(),
                        format!("{} fps", summary.frame_rate),
                        format!("{:.2} s", summary.duration_seconds),
                        verdict,
                    ],
                );
            }
            Err(error) => {
                add_table_row(
                    &mut table,
                    &[
                        path.display().to_string(),
                        "-".to_string(),
                        "-".to_string(),
                        "-".to_string(),
                        format!("{} {error}", style("✗").red()),
                    ],
                );
            }
        }
    }

    table.printstd();
    println!();
    println!("{}: {}", style("Attached").bold(), model.animations().len());

    Ok(())
}

fn handle_tree(
    path: PathBuf,
    depth: Option<usize>,
    no_color: bool,
    compact: bool,
) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let root = match detect_kind(&path)? {
        FileKind::Mesh => {
            let model = Md5Model::load(&path)
                .with_context(|| format!("Failed to load model from {}", path.display()))?;
            model_tree(&model, file_name, file_size(&path))
        }
        FileKind::Anim => {
            let animation = Md5Animation::load(&path)
                .with_context(|| format!("Failed to load animation from {}", path.display()))?;
            animation_tree(&animation, file_name, file_size(&path))
        }
    };

    let options = TreeOptions {
        max_depth: depth,
        no_color,
        show_metadata: true,
        compact,
    };

    print!("{}", render_tree(&root, &options));
    Ok(())
}

fn model_tree(model: &Md5Model, file_name: String, size: u64) -> TreeNode {
    let joints = model.joints();
    let (children, roots) = joint_adjacency(joints.len(), |index| joints[index].parent_index());

    let mut skeleton_node = TreeNode::new("Skeleton".to_string(), NodeType::Header)
        .with_metadata("joints", &joints.len().to_string());
    for root in roots {
        skeleton_node = skeleton_node.add_child(joint_node(root, joints, &children));
    }

    let mut meshes_node = TreeNode::new("Meshes".to_string(), NodeType::Header)
        .with_metadata("count", &model.meshes().len().to_string());
    for (index, mesh) in model.meshes().iter().enumerate() {
        let node = TreeNode::new(format!("mesh {index}"), NodeType::Mesh)
            .with_metadata("vertices", &mesh.vertices().len().to_string())
            .with_metadata("triangles", &mesh.triangles().len().to_string())
            .with_metadata("weights", &mesh.weights().len().to_string())
            .with_external_ref(mesh.shader(), detect_ref_type(mesh.shader()));
        meshes_node = meshes_node.add_child(node);
    }

    TreeNode::new(file_name, NodeType::Root)
        .with_size(size)
        .with_metadata("version", &model.version().to_string())
        .add_child(skeleton_node)
        .add_child(meshes_node)
}

fn animation_tree(animation: &Md5Animation, file_name: String, size: u64) -> TreeNode {
    let infos = animation.joint_infos();
    let (children, roots) = joint_adjacency(infos.len(), |index| infos[index].parent_index());

    let mut hierarchy_node = TreeNode::new("Hierarchy".to_string(), NodeType::Header)
        .with_metadata("joints", &infos.len().to_string());
    for root in roots {
        hierarchy_node = hierarchy_node.add_child(info_node(root, infos, &children));
    }

    TreeNode::new(file_name, NodeType::Root)
        .with_size(size)
        .with_metadata("version", &animation.version().to_string())
        .with_metadata("frames", &animation.frame_count().to_string())
        .with_metadata("rate", &format!("{} fps", animation.frame_rate()))
        .add_child(hierarchy_node)
}

/// Builds a parent-to-children adjacency list plus the list of roots.
fn joint_adjacency(
    count: usize,
    parent_of: impl Fn(usize) -> Option<usize>,
) -> (Vec<Vec<usize>>, Vec<usize>) {
    let mut children = vec![Vec::new(); count];
    let mut roots = Vec::new();
    for index in 0..count {
        match parent_of(index) {
            Some(parent) => children[parent].push(index),
            None => roots.push(index),
        }
    }
    (children, roots)
}

fn joint_node(index: usize, joints: &[Joint], children: &[Vec<usize>]) -> TreeNode {
    let joint = &joints[index];
    let mut node = TreeNode::new(joint.name.clone(), NodeType::Joint).with_metadata(
        "position",
        &format!(
            "({:.1}, {:.1}, {:.1})",
            joint.position.x, joint.position.y, joint.position.z
        ),
    );
    for &child in &children[index] {
        node = node.add_child(joint_node(child, joints, children));
    }
    node
}

fn info_node(index: usize, infos: &[JointInfo], children: &[Vec<usize>]) -> TreeNode {
    let info = &infos[index];
    let mut node = TreeNode::new(info.name.clone(), NodeType::Joint)
        .with_metadata("flags", &format!("0x{:02X}", info.flags.bits()));
    for &child in &children[index] {
        node = node.add_child(info_node(child, infos, children));
    }
    node
}

fn handle_validate(path: PathBuf) -> Result<()> {
    use console::style;

    println!("{}", style("Validating MD5 File").bold().cyan());
    println!("{}", style("===================").cyan());
    println!();
    println!("{}: {}", style("File").bold(), path.display());
    println!();

    let warnings = match detect_kind(&path)? {
        FileKind::Mesh => {
            let model = Md5Model::load(&path)
                .with_context(|| format!("Failed to load model from {}", path.display()))?;
            model.validate()
        }
        FileKind::Anim => {
            let animation = Md5Animation::load(&path)
                .with_context(|| format!("Failed to load animation from {}", path.display()))?;
            animation.validate()
        }
    };

    if warnings.is_empty() {
        println!(
            "{} {}",
            style("✓").green(),
            style("File loads cleanly").green()
        );
    } else {
        println!("{} {} warning(s):", style("⚠").yellow(), warnings.len());
        for warning in &warnings {
            println!("  {} {warning}", style("•").yellow());
        }
    }

    Ok(())
}
