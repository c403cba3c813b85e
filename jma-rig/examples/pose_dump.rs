use jma_rig::{
    AnimationGraph, Diagnostics, GameVersion, ImportOptions, Importer, ReferenceSkeleton,
    References, Severity,
};
use serde_json::json;
use std::path::PathBuf;

fn load_reference(path: Option<&PathBuf>) -> Option<ReferenceSkeleton> {
    let path = path?;
    let json = std::fs::read_to_string(path).expect("read reference json");
    Some(ReferenceSkeleton::from_json_str(&json).expect("parse reference json"))
}

fn parse_game_version(value: &str) -> GameVersion {
    match value {
        "haloce" => GameVersion::HaloCe,
        "halo2" => GameVersion::Halo2,
        "halo3" => GameVersion::Halo3,
        other => panic!("unknown game version '{other}' (expected haloce, halo2 or halo3)"),
    }
}

fn main() {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut positional = Vec::<PathBuf>::new();
    let mut options = ImportOptions::default();
    let mut frame: Option<usize> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--fix-parents" => {
                options.fix_parents = true;
                i += 1;
            }
            "--fix-rotations" => {
                options.fix_rotations = true;
                i += 1;
            }
            "--game" => {
                if let Some(value) = args.get(i + 1) {
                    options.game_version = parse_game_version(value);
                }
                i += 2;
            }
            "--frame" => {
                frame = args.get(i + 1).and_then(|value| value.parse().ok());
                i += 2;
            }
            other => {
                positional.push(PathBuf::from(other));
                i += 1;
            }
        }
    }

    let Some(animation_path) = positional.first() else {
        eprintln!(
            "usage: pose_dump <animation.json> [reference_a.json] [reference_b.json] \
             [--game haloce|halo2|halo3] [--fix-parents] [--fix-rotations] [--frame N]"
        );
        std::process::exit(2);
    };

    let json = std::fs::read_to_string(animation_path).expect("read animation json");
    let graph = AnimationGraph::from_json_str(&json).expect("parse animation json");
    let reference_a = load_reference(positional.get(1));
    let reference_b = load_reference(positional.get(2));

    let mut diagnostics = Diagnostics::new();
    let result = Importer::new(options).import(
        &graph,
        References::new(reference_a.as_ref(), reference_b.as_ref()),
        None,
        &mut diagnostics,
    );

    let diagnostics_out: Vec<_> = diagnostics
        .entries()
        .iter()
        .map(|entry| {
            let severity = match entry.severity {
                Severity::Info => "info",
                Severity::Warning => "warning",
                Severity::Error => "error",
            };
            json!({ "severity": severity, "message": entry.message })
        })
        .collect();

    let Ok(imported) = result else {
        let out = json!({ "ok": false, "diagnostics": diagnostics_out });
        println!("{}", serde_json::to_string(&out).expect("json"));
        std::process::exit(1);
    };

    let bones: Vec<_> = imported
        .hierarchy
        .bones
        .iter()
        .enumerate()
        .map(|(i, bone)| {
            json!({
                "i": i,
                "name": bone.name,
                "node": bone.node_index,
                "parent": bone.parent,
                "root": bone.is_root,
                "length": bone.length,
                "restWorld": bone.rest_world.to_cols_array(),
            })
        })
        .collect();

    let frames: Vec<_> = imported
        .animation
        .frames
        .iter()
        .filter(|pose| frame.is_none_or(|n| pose.frame_number() == n))
        .map(|pose| {
            let root_motion = pose.root_motion.map(|motion| {
                json!({ "location": motion.location.to_array(), "yaw": motion.yaw })
            });
            let matrices: Vec<_> = pose.bones.iter().map(|m| m.to_cols_array()).collect();
            json!({
                "frame": pose.frame_number(),
                "rootMotion": root_motion,
                "bones": matrices,
            })
        })
        .collect();

    let out = json!({
        "ok": true,
        "mode": format!("{:?}", imported.hierarchy.mode),
        "frameRate": imported.animation.frame_rate,
        "frameCount": imported.animation.frame_count,
        "bones": bones,
        "frames": frames,
        "diagnostics": diagnostics_out,
    });

    println!("{}", serde_json::to_string(&out).expect("json"));
}
