//! Example: Play an MD5 animation and sample the posed skeleton
//!
//! This example attaches a `.md5anim` clip to a model, advances the playback
//! clock at a fixed timestep, and prints where a joint ends up each tick. It
//! finishes by uploading a GPU joint palette into a plain `Vec<f32>`.
//!
//! Usage: cargo run --example play_animation -- <path_to_md5mesh> <path_to_md5anim>

use idtech_md5::{Md5Model, SkinningMethod};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <path_to_md5mesh> <path_to_md5anim>", args[0]);
        eprintln!(
            "Example: {} models/imp/imp.md5mesh models/imp/walk1.md5anim",
            args[0]
        );
        std::process::exit(1);
    }

    let mut model = Md5Model::load(&args[1])?;
    let slot = model.load_animation(&args[2])?;

    let animation = model.animation(slot).ok_or("animation slot missing")?;
    println!("Playing: {}", animation.name());
    println!(
        "  {} frames at {} fps ({:.2} s)",
        animation.frame_count(),
        animation.frame_rate(),
        animation.duration()
    );

    // ========================================
    // 1. CPU PLAYBACK
    // ========================================
    println!("\n=== CPU PLAYBACK ===");
    model.play(slot);

    let tracked = model.joints().len() - 1;
    let step = 1.0 / 30.0;
    for tick in 0..8 {
        model.update(step);
        if let Some(skeleton) = model.current_skeleton() {
            let joint = &skeleton.joints[tracked];
            println!(
                "  tick {tick}: joint {tracked} at ({:.2}, {:.2}, {:.2})",
                joint.position.x, joint.position.y, joint.position.z
            );
        }
    }

    // ========================================
    // 2. GPU PALETTE
    // ========================================
    println!("\n=== GPU PALETTE ===");
    model.set_skinning_method(SkinningMethod::Gpu);
    model.play(slot);
    model.update(step);

    let mut palette: Vec<f32> = Vec::new();
    model.write_joint_matrices(&mut palette);
    println!(
        "  {} floats ({} matrices of 16)",
        palette.len(),
        palette.len() / 16
    );

    let translation = &palette[tracked * 16 + 12..tracked * 16 + 15];
    println!(
        "  joint {tracked} palette translation: ({:.2}, {:.2}, {:.2})",
        translation[0], translation[1], translation[2]
    );

    Ok(())
}
