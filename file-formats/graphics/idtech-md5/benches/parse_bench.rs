use criterion::{Criterion, criterion_group, criterion_main};
use idtech_md5::{Md5Animation, Md5Model};
use std::fmt::Write;

const JOINTS: usize = 32;
const VERTICES: usize = 300;
const FRAMES: usize = 60;

/// Builds a chain-skeleton model with one mesh of single-weight vertices.
fn model_text() -> String {
    let mut text = String::from("MD5Version 10\ncommandline \"\"\n\n");
    let _ = writeln!(text, "numJoints {JOINTS}\nnumMeshes 1\n\njoints {{");
    text.push_str("\t\"root\"\t-1 ( 0 0 0 ) ( 0 0 0 )\n");
    for joint in 1..JOINTS {
        let _ = writeln!(
            text,
            "\t\"bone{joint}\"\t{} ( 0 {joint} 0 ) ( 0 0 0 )",
            joint - 1
        );
    }
    text.push_str("}\n\nmesh {\n\tshader \"models/bench/body\"\n\n");

    let _ = writeln!(text, "\tnumverts {VERTICES}");
    for vertex in 0..VERTICES {
        let _ = writeln!(text, "\tvert {vertex} ( 0.5 0.5 ) {vertex} 1");
    }

    let triangles = VERTICES / 3;
    let _ = writeln!(text, "\n\tnumtris {triangles}");
    for triangle in 0..triangles {
        let base = triangle * 3;
        let _ = writeln!(text, "\ttri {triangle} {base} {} {}", base + 1, base + 2);
    }

    let _ = writeln!(text, "\n\tnumweights {VERTICES}");
    for weight in 0..VERTICES {
        let joint = weight % JOINTS;
        let _ = writeln!(text, "\tweight {weight} {joint} 1.0 ( 1 0 0 )");
    }
    text.push_str("}\n");
    text
}

/// Builds a fully animated clip for the same chain skeleton.
fn animation_text() -> String {
    let components = (JOINTS - 1) * 6;
    let mut text = String::from("MD5Version 10\n");
    let _ = writeln!(
        text,
        "numFrames {FRAMES}\nnumJoints {JOINTS}\nframeRate 24\nnumAnimatedComponents {components}"
    );

    text.push_str("hierarchy {\n\t\"root\"\t-1 0 0\n");
    for joint in 1..JOINTS {
        let start = (joint - 1) * 6;
        let _ = writeln!(text, "\t\"bone{joint}\"\t{} 63 {start}", joint - 1);
    }
    text.push_str("}\nbounds {\n");
    for _ in 0..FRAMES {
        text.push_str("\t( -40 -40 -40 ) ( 40 40 40 )\n");
    }
    text.push_str("}\nbaseframe {\n");
    text.push_str("\t( 0 0 0 ) ( 0 0 0 )\n");
    for joint in 1..JOINTS {
        let _ = writeln!(text, "\t( 0 {joint} 0 ) ( 0 0 0 )");
    }
    text.push_str("}\n");

    for frame in 0..FRAMES {
        let _ = writeln!(text, "frame {frame} {{");
        let sway = (frame as f32) * 0.05;
        for joint in 1..JOINTS {
            let _ = writeln!(text, "\t{sway:.2} {joint} 0 0 0 0");
        }
        text.push_str("}\n");
    }
    text
}

fn bench_model_parse(c: &mut Criterion) {
    let text = model_text();

    c.bench_function("parse_model", |b| {
        b.iter(|| {
            let _model = Md5Model::parse(&text, "bench").unwrap();
        })
    });
}

fn bench_animation_parse(c: &mut Criterion) {
    let text = animation_text();

    c.bench_function("parse_animation", |b| {
        b.iter(|| {
            let _animation = Md5Animation::parse(&text, "bench").unwrap();
        })
    });
}

fn bench_playback_tick(c: &mut Criterion) {
    let mut model = Md5Model::parse(&model_text(), "bench").unwrap();
    let animation = Md5Animation::parse(&animation_text(), "bench").unwrap();
    model.add_animation(animation).unwrap();
    model.play(0);

    c.bench_function("playback_tick", |b| {
        b.iter(|| model.update(0.016));
    });
}

criterion_group!(
    benches,
    bench_model_parse,
    bench_animation_parse,
    bench_playback_tick
);
criterion_main!(benches);
