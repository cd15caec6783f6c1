//! `.md5anim` parsing and per-animation playback state.
//!
//! An animation file declares its sizes up front (`numFrames`, `numJoints`,
//! `frameRate`, `numAnimatedComponents`), then a `hierarchy` block naming
//! each joint's animated components, per-frame `bounds`, a `baseframe`
//! pose, and one compact `frame N` float block per frame. Parsing expands
//! every frame into a world-space [`Skeleton`] once, at load; playback then
//! only interpolates between two prebuilt frames per tick.

use std::fmt;
use std::fs;
use std::path::Path;

use glam::{Quat, Vec3};
use log::{debug, warn};

use crate::error::{Md5Error, Result};
use crate::skeleton::{Skeleton, build_frame_skeleton, compute_quaternion_w};
use crate::tokenizer::{TextCursor, Tokens};
use crate::types::Bound;
use crate::version::{ANIM_EXTENSION, Md5Version, check_extension};

bitflags::bitflags! {
    /// Which of a joint's six transform components are stored per frame.
    ///
    /// Components without their bit set are inherited from the base frame.
    /// Stored components appear in each frame's float array in the fixed
    /// order TX, TY, TZ, QX, QY, QZ, starting at the joint's `start_index`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ComponentFlags: u32 {
        /// `position.x` is animated
        const TRANSLATE_X = 0x01;
        /// `position.y` is animated
        const TRANSLATE_Y = 0x02;
        /// `position.z` is animated
        const TRANSLATE_Z = 0x04;
        /// `orientation.x` is animated
        const QUAT_X = 0x08;
        /// `orientation.y` is animated
        const QUAT_Y = 0x10;
        /// `orientation.z` is animated
        const QUAT_Z = 0x20;
    }
}

impl ComponentFlags {
    /// Number of floats this joint occupies in each frame's array
    pub fn component_count(self) -> usize {
        self.bits().count_ones() as usize
    }
}

/// One entry of an animation's `hierarchy` block
#[derive(Debug, Clone, PartialEq)]
pub struct JointInfo {
    /// Joint name; matches the model joint it animates
    pub name: String,
    /// Parent joint index, `-1` for a root; always below this joint's own index
    pub parent: i32,
    /// Animated-component mask
    pub flags: ComponentFlags,
    /// Offset of this joint's first stored component in a frame's array
    pub start_index: usize,
}

impl JointInfo {
    /// Parent as an index, `None` for a root joint
    pub fn parent_index(&self) -> Option<usize> {
        usize::try_from(self.parent).ok()
    }
}

/// One entry of the `baseframe` block: a joint's neutral pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseFrameJoint {
    /// Neutral position
    pub position: Vec3,
    /// Neutral orientation, `w` reconstructed on the negative root
    pub orientation: Quat,
}

/// One frame's packed animated components
#[derive(Clone, PartialEq)]
pub struct FrameData {
    /// Dense float array of exactly `numAnimatedComponents` entries
    pub components: Vec<f32>,
}

impl FrameData {
    /// Wraps an already-collected component array
    pub fn from_components(components: Vec<f32>) -> Self {
        Self { components }
    }
}

impl fmt::Debug for FrameData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameData({} components)", self.components.len())
    }
}

/// Compact description of a loaded animation for tooling output
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationSummary {
    /// Animation name, derived from the file path
    pub name: String,
    /// Number of frames
    pub frame_count: usize,
    /// Number of joints
    pub joint_count: usize,
    /// Sampling rate in frames per second
    pub frame_rate: u32,
    /// Floats per frame
    pub component_count: usize,
    /// Total duration in seconds
    pub duration_seconds: f32,
    /// First frame's bounding box, if bounds were present
    pub first_bound: Option<([f32; 3], [f32; 3])>,
}

/// A parsed `.md5anim` keyframe animation with its playback clock
#[derive(Debug, Clone)]
pub struct Md5Animation {
    name: String,
    version: Md5Version,
    frame_rate: u32,
    component_count: usize,
    joint_infos: Vec<JointInfo>,
    bounds: Vec<Bound>,
    base_frame: Vec<BaseFrameJoint>,
    frames: Vec<FrameData>,
    skeletons: Vec<Skeleton>,
    frame_duration: f32,
    duration: f32,
    current_frame: usize,
    time: f32,
    current_skeleton: Skeleton,
}

impl Md5Animation {
    /// Name reported for an inactive animation slot
    pub const DEFAULT_NAME: &'static str = "None";

    /// Loads an animation from a `.md5anim` path.
    ///
    /// The path must end in the 7-character `md5anim` suffix; the
    /// animation name is the file stem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        check_extension(path, ANIM_EXTENSION)?;
        let text = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
        Self::parse(&text, name)
    }

    /// Parses animation text that has already been read.
    pub fn parse(text: &str, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let mut cursor = TextCursor::new(text);
        let mut version: Option<Md5Version> = None;
        let mut frame_count: Option<usize> = None;
        let mut joint_count: Option<usize> = None;
        let mut frame_rate: Option<u32> = None;
        let mut component_count: Option<usize> = None;
        let mut joint_infos: Vec<JointInfo> = Vec::new();
        let mut bounds: Vec<Bound> = Vec::new();
        let mut base_frame: Vec<BaseFrameJoint> = Vec::new();
        let mut frames: Vec<Option<FrameData>> = Vec::new();

        while let Some(mut line) = cursor.next_line() {
            let Some(key) = line.next_token() else { continue };
            match key {
                "MD5Version" => {
                    let token = line.expect_token("MD5Version")?;
                    version = Some(Md5Version::parse_token(token)?);
                }
                "commandline" => {} // exporter metadata, ignored
                "numFrames" => frame_count = Some(line.next_usize("numFrames")?),
                "numJoints" => joint_count = Some(line.next_usize("numJoints")?),
                "frameRate" => frame_rate = Some(line.next_u32("frameRate")?),
                "numAnimatedComponents" => {
                    component_count = Some(line.next_usize("numAnimatedComponents")?);
                }
                "hierarchy" => {
                    required(version, "MD5Version", "hierarchy", line.line())?;
                    let declared = required(joint_count, "numJoints", "hierarchy", line.line())?;
                    joint_infos = read_hierarchy(&mut cursor, declared)?;
                }
                "bounds" => {
                    required(version, "MD5Version", "bounds", line.line())?;
                    let declared = required(frame_count, "numFrames", "bounds", line.line())?;
                    bounds = read_bounds(&mut cursor, declared)?;
                }
                "baseframe" => {
                    required(version, "MD5Version", "baseframe", line.line())?;
                    let declared = required(joint_count, "numJoints", "baseframe", line.line())?;
                    base_frame = read_base_frame(&mut cursor, declared)?;
                }
                "frame" => {
                    required(version, "MD5Version", "frame", line.line())?;
                    let declared_frames = required(frame_count, "numFrames", "frame", line.line())?;
                    let declared_components =
                        required(component_count, "numAnimatedComponents", "frame", line.line())?;
                    let index = line.next_usize("frame index")?;
                    if index >= declared_frames {
                        return Err(Md5Error::MalformedBlock {
                            block: "frame",
                            line: line.line(),
                            reason: format!(
                                "frame index {index} out of range (numFrames {declared_frames})"
                            ),
                        });
                    }
                    if frames.is_empty() {
                        frames = vec![None; declared_frames];
                    }
                    frames[index] = Some(read_frame(&mut cursor, declared_components)?);
                }
                _ => {}
            }
        }

        let version = version.ok_or(Md5Error::MissingDirective {
            directive: "MD5Version",
            block: "md5anim",
            line: cursor.line_number(),
        })?;
        let frame_rate = frame_rate.unwrap_or(0);
        let component_count = component_count.unwrap_or(0);
        let declared_frames = frame_count.unwrap_or(0);
        if frames.is_empty() && declared_frames > 0 {
            frames = vec![None; declared_frames];
        }

        if joint_infos.len() != base_frame.len() {
            return Err(Md5Error::MalformedBlock {
                block: "baseframe",
                line: cursor.line_number(),
                reason: format!(
                    "hierarchy has {} joints but baseframe has {}",
                    joint_infos.len(),
                    base_frame.len()
                ),
            });
        }
        for info in &joint_infos {
            let needed = info.flags.component_count();
            if needed > 0 && info.start_index + needed > component_count {
                return Err(Md5Error::MalformedBlock {
                    block: "hierarchy",
                    line: cursor.line_number(),
                    reason: format!(
                        "joint `{}` reads components {}..{} beyond numAnimatedComponents {}",
                        info.name,
                        info.start_index,
                        info.start_index + needed,
                        component_count
                    ),
                });
            }
        }
        let frames: Vec<FrameData> = frames
            .into_iter()
            .enumerate()
            .map(|(index, frame)| {
                frame.ok_or_else(|| Md5Error::MalformedBlock {
                    block: "frame",
                    line: cursor.line_number(),
                    reason: format!("missing frame {index}"),
                })
            })
            .collect::<Result<_>>()?;

        let skeletons: Vec<Skeleton> = frames
            .iter()
            .map(|frame| build_frame_skeleton(&joint_infos, &base_frame, frame))
            .collect();
        let mut current_skeleton = skeletons.first().cloned().unwrap_or_default();
        current_skeleton.rebuild_matrices();

        let frame_duration = 1.0 / frame_rate as f32;
        let duration = frame_duration * frames.len() as f32;
        debug!(
            "loaded animation `{name}`: {} joints, {} frames at {frame_rate} fps",
            joint_infos.len(),
            frames.len()
        );
        Ok(Self {
            name,
            version,
            frame_rate,
            component_count,
            joint_infos,
            bounds,
            base_frame,
            frames,
            skeletons,
            frame_duration,
            duration,
            current_frame: 0,
            time: 0.0,
            current_skeleton,
        })
    }

    /// Advances the playback clock and refreshes the live skeleton.
    ///
    /// Time wraps frame by frame; the live skeleton is the interpolation of
    /// the current frame and its successor at the fractional frame time.
    /// With fewer than two frames there is nothing to advance and the live
    /// skeleton stays on the static pose.
    pub fn update(&mut self, delta_time: f32) {
        let frame_count = self.frames.len();
        if frame_count < 2 {
            return;
        }
        self.time += delta_time;
        while self.time >= self.frame_duration {
            self.time -= self.frame_duration;
            self.current_frame = (self.current_frame + 1) % frame_count;
        }
        let next_frame = (self.current_frame + 1) % frame_count;
        let t = (self.time / self.frame_duration).clamp(0.0, 1.0);
        self.current_skeleton.interpolate_between(
            &self.skeletons[self.current_frame],
            &self.skeletons[next_frame],
            t,
        );
    }

    /// Jumps to `frame` and resets the fractional clock.
    ///
    /// Returns `false` (leaving playback untouched) if the frame is out of
    /// range.
    pub fn set_current_frame(&mut self, frame: usize) -> bool {
        if frame >= self.frames.len() {
            warn!(
                "animation `{}`: frame {frame} out of range ({} frames)",
                self.name,
                self.frames.len()
            );
            return false;
        }
        self.current_frame = frame;
        self.time = 0.0;
        self.current_skeleton = self.skeletons[frame].clone();
        self.current_skeleton.rebuild_matrices();
        true
    }

    /// Resets the clock to frame 0
    pub fn reset(&mut self) {
        self.set_current_frame(0);
    }

    /// Animation name, derived from the file path
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Format version the file declared
    pub fn version(&self) -> Md5Version {
        self.version
    }

    /// Number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of joints
    pub fn joint_count(&self) -> usize {
        self.joint_infos.len()
    }

    /// Sampling rate in frames per second
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Floats per frame
    pub fn component_count(&self) -> usize {
        self.component_count
    }

    /// Seconds one frame covers
    pub fn frame_duration(&self) -> f32 {
        self.frame_duration
    }

    /// Total duration in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Frame the clock currently sits in
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Seconds into the current frame
    pub fn current_time(&self) -> f32 {
        self.time
    }

    /// Live skeleton produced by the last [`update`](Self::update)
    pub fn current_skeleton(&self) -> &Skeleton {
        &self.current_skeleton
    }

    /// Hierarchy entries in file order
    pub fn joint_infos(&self) -> &[JointInfo] {
        &self.joint_infos
    }

    /// Per-frame bounding boxes, if the file carried a `bounds` block
    pub fn bounds(&self) -> &[Bound] {
        &self.bounds
    }

    /// Base-frame pose in file order
    pub fn base_frame(&self) -> &[BaseFrameJoint] {
        &self.base_frame
    }

    /// Packed per-frame component arrays
    pub fn frames(&self) -> &[FrameData] {
        &self.frames
    }

    /// Prebuilt world-space skeleton of every frame
    pub fn skeletons(&self) -> &[Skeleton] {
        &self.skeletons
    }

    /// Compact description for tooling output
    pub fn summary(&self) -> AnimationSummary {
        AnimationSummary {
            name: self.name.clone(),
            frame_count: self.frames.len(),
            joint_count: self.joint_infos.len(),
            frame_rate: self.frame_rate,
            component_count: self.component_count,
            duration_seconds: self.duration,
            first_bound: self
                .bounds
                .first()
                .map(|bound| (bound.min.to_array(), bound.max.to_array())),
        }
    }
}

fn required<T: Copy>(
    value: Option<T>,
    directive: &'static str,
    block: &'static str,
    line: usize,
) -> Result<T> {
    value.ok_or(Md5Error::MissingDirective {
        directive,
        block,
        line,
    })
}

fn read_hierarchy(cursor: &mut TextCursor<'_>, declared: usize) -> Result<Vec<JointInfo>> {
    let mut infos: Vec<JointInfo> = Vec::with_capacity(declared);
    loop {
        let mut line = cursor.block_line("hierarchy")?;
        if line.closes_block() {
            break;
        }
        let Some(first) = line.next_token() else {
            continue;
        };
        if infos.len() == declared {
            return Err(Md5Error::MalformedBlock {
                block: "hierarchy",
                line: line.line(),
                reason: format!("more than the declared {declared} joints"),
            });
        }
        let name = first.to_string();
        let parent = line.next_i32("joint parent")?;
        let raw_flags = line.next_u32("joint flags")?;
        let flags = ComponentFlags::from_bits_truncate(raw_flags);
        if flags.bits() != raw_flags {
            warn!(
                "joint `{name}`: ignoring unknown flag bits {:#x}",
                raw_flags & !ComponentFlags::all().bits()
            );
        }
        let start_index = line.next_usize("joint start index")?;
        let index = infos.len();
        check_parent_link(&name, index, parent)?;
        infos.push(JointInfo {
            name,
            parent,
            flags,
            start_index,
        });
    }
    expect_entry_count("hierarchy", "joints", infos.len(), declared, cursor)?;
    Ok(infos)
}

fn read_bounds(cursor: &mut TextCursor<'_>, declared: usize) -> Result<Vec<Bound>> {
    let mut bounds: Vec<Bound> = Vec::with_capacity(declared);
    loop {
        let mut line = cursor.block_line("bounds")?;
        if line.closes_block() {
            break;
        }
        if line.peek_token().is_none() {
            continue;
        }
        if bounds.len() == declared {
            return Err(Md5Error::MalformedBlock {
                block: "bounds",
                line: line.line(),
                reason: format!("more than the declared {declared} bounds"),
            });
        }
        let min = line.vec3("bound minimum")?;
        let max = line.vec3("bound maximum")?;
        bounds.push(Bound { min, max });
    }
    expect_entry_count("bounds", "bounds", bounds.len(), declared, cursor)?;
    Ok(bounds)
}

fn read_base_frame(cursor: &mut TextCursor<'_>, declared: usize) -> Result<Vec<BaseFrameJoint>> {
    let mut base_frame: Vec<BaseFrameJoint> = Vec::with_capacity(declared);
    loop {
        let mut line = cursor.block_line("baseframe")?;
        if line.closes_block() {
            break;
        }
        if line.peek_token().is_none() {
            continue;
        }
        if base_frame.len() == declared {
            return Err(Md5Error::MalformedBlock {
                block: "baseframe",
                line: line.line(),
                reason: format!("more than the declared {declared} joints"),
            });
        }
        let position = line.vec3("baseframe position")?;
        let rotation = line.vec3("baseframe orientation")?;
        base_frame.push(BaseFrameJoint {
            position,
            orientation: Quat::from_xyzw(
                rotation.x,
                rotation.y,
                rotation.z,
                compute_quaternion_w(rotation.x, rotation.y, rotation.z),
            ),
        });
    }
    expect_entry_count("baseframe", "joints", base_frame.len(), declared, cursor)?;
    Ok(base_frame)
}

fn read_frame(cursor: &mut TextCursor<'_>, declared: usize) -> Result<FrameData> {
    let mut components: Vec<f32> = Vec::with_capacity(declared);
    loop {
        let mut line = cursor.block_line("frame")?;
        if line.closes_block() {
            break;
        }
        while let Some(value) = line.next_f32_opt("frame component")? {
            if components.len() == declared {
                return Err(Md5Error::MalformedBlock {
                    block: "frame",
                    line: line.line(),
                    reason: format!("more than the declared {declared} components"),
                });
            }
            components.push(value);
        }
    }
    if components.len() == declared {
        Ok(FrameData { components })
    } else {
        Err(Md5Error::MalformedBlock {
            block: "frame",
            line: cursor.line_number(),
            reason: format!(
                "expected {declared} components, found {}",
                components.len()
            ),
        })
    }
}

pub(crate) fn check_parent_link(name: &str, index: usize, parent: i32) -> Result<()> {
    let valid = parent == -1 || (parent >= 0 && (parent as usize) < index);
    if valid {
        Ok(())
    } else {
        Err(Md5Error::InvalidHierarchy {
            joint: name.to_string(),
            index,
            parent,
        })
    }
}

fn expect_entry_count(
    block: &'static str,
    noun: &str,
    found: usize,
    declared: usize,
    cursor: &TextCursor<'_>,
) -> Result<()> {
    if found == declared {
        Ok(())
    } else {
        Err(Md5Error::MalformedBlock {
            block,
            line: cursor.line_number(),
            reason: format!("expected {declared} {noun}, found {found}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const WAVE: &str = r#"MD5Version 10
commandline "exported"

numFrames 2
numJoints 2
frameRate 10
numAnimatedComponents 3

hierarchy {
	"origin"	-1 3 0	// ( Tx Ty )
	"arm"	0 8 2	// Qx
}

bounds {
	( -1 -1 -1 ) ( 1 1 1 )
	( -2 -2 -2 ) ( 2 2 2 )
}

baseframe {
	( 0 0 0 ) ( 0 0 0 )
	( 0 5 0 ) ( 0 0 0 )
}

frame 0 {
	 0 0
	 0
}

frame 1 {
	 4 2
	 0.5
}
"#;

    fn wave() -> Md5Animation {
        Md5Animation::parse(WAVE, "wave").unwrap()
    }

    #[test]
    fn parses_directives_and_blocks() {
        let anim = wave();
        assert_eq!(anim.name(), "wave");
        assert_eq!(anim.frame_count(), 2);
        assert_eq!(anim.joint_count(), 2);
        assert_eq!(anim.frame_rate(), 10);
        assert_eq!(anim.component_count(), 3);
        assert_eq!(anim.bounds().len(), 2);
        assert_eq!(anim.joint_infos()[0].name, "origin");
        assert_eq!(
            anim.joint_infos()[0].flags,
            ComponentFlags::TRANSLATE_X | ComponentFlags::TRANSLATE_Y
        );
        assert_eq!(anim.joint_infos()[1].flags, ComponentFlags::QUAT_X);
        assert_eq!(anim.joint_infos()[1].start_index, 2);
        assert!((anim.frame_duration() - 0.1).abs() < 1e-6);
        assert!((anim.duration() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn frames_become_world_space_skeletons() {
        let anim = wave();
        // Frame 1 moves the origin joint to (4, 2, 0); the arm rides along.
        let skeleton = &anim.skeletons()[1];
        assert!((skeleton.joints[0].position - Vec3::new(4.0, 2.0, 0.0)).length() < 1e-6);
        assert!((skeleton.joints[1].position - Vec3::new(4.0, 7.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn clock_advances_only_on_full_frames() {
        let mut anim = wave();
        anim.update(0.05);
        assert_eq!(anim.current_frame(), 0);
        anim.update(0.05);
        assert_eq!(anim.current_frame(), 1);
    }

    #[test]
    fn clock_wraps_across_the_frame_count() {
        let mut anim = wave();
        let dt = anim.frame_duration() * (anim.frame_count() as f32 + 0.5);
        anim.update(dt);
        assert_eq!(anim.current_frame(), 0);
        assert!((anim.current_time() - 0.5 * anim.frame_duration()).abs() < 1e-5);
    }

    #[test]
    fn single_frame_animations_stay_static() {
        let text = "MD5Version 10\n\
                    numFrames 1\n\
                    numJoints 1\n\
                    frameRate 24\n\
                    numAnimatedComponents 0\n\
                    hierarchy {\n\"origin\" -1 0 0\n}\n\
                    baseframe {\n( 0 0 0 ) ( 0 0 0 )\n}\n\
                    frame 0 {\n}\n";
        let mut anim = Md5Animation::parse(text, "static").unwrap();
        anim.update(10.0);
        assert_eq!(anim.current_frame(), 0);
        assert_eq!(anim.current_time(), 0.0);
    }

    #[test]
    fn set_current_frame_is_bounds_checked() {
        let mut anim = wave();
        assert!(anim.set_current_frame(1));
        assert_eq!(anim.current_frame(), 1);
        assert!(!anim.set_current_frame(2));
        assert_eq!(anim.current_frame(), 1);
    }

    #[test]
    fn hierarchy_before_num_joints_is_rejected() {
        let text = WAVE.replace("numJoints 2\n", "");
        match Md5Animation::parse(&text, "broken") {
            Err(Md5Error::MissingDirective {
                directive: "numJoints",
                block: "hierarchy",
                ..
            }) => {}
            other => panic!("expected MissingDirective, got {other:?}"),
        }
    }

    #[test]
    fn missing_version_is_rejected() {
        let text = WAVE.replace("MD5Version 10\n", "");
        assert!(matches!(
            Md5Animation::parse(&text, "broken"),
            Err(Md5Error::MissingDirective {
                directive: "MD5Version",
                ..
            })
        ));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let text = WAVE.replace("MD5Version 10", "MD5Version 11");
        assert!(matches!(
            Md5Animation::parse(&text, "broken"),
            Err(Md5Error::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn forward_parent_references_are_rejected() {
        let text = WAVE.replace("\"origin\"\t-1 3 0", "\"origin\"\t1 3 0");
        assert!(matches!(
            Md5Animation::parse(&text, "broken"),
            Err(Md5Error::InvalidHierarchy { parent: 1, .. })
        ));
    }

    #[test]
    fn frame_component_overflow_is_rejected() {
        let text = WAVE.replace("frame 1 {\n\t 4 2\n\t 0.5\n}", "frame 1 {\n\t 4 2\n\t 0.5 9\n}");
        assert!(matches!(
            Md5Animation::parse(&text, "broken"),
            Err(Md5Error::MalformedBlock { block: "frame", .. })
        ));
    }

    #[test]
    fn short_frame_is_rejected() {
        let text = WAVE.replace("frame 1 {\n\t 4 2\n\t 0.5\n}", "frame 1 {\n\t 4 2\n}");
        assert!(matches!(
            Md5Animation::parse(&text, "broken"),
            Err(Md5Error::MalformedBlock { block: "frame", .. })
        ));
    }

    #[test]
    fn start_index_past_component_array_is_rejected() {
        let text = WAVE.replace("\"arm\"\t0 8 2", "\"arm\"\t0 8 3");
        assert!(matches!(
            Md5Animation::parse(&text, "broken"),
            Err(Md5Error::MalformedBlock {
                block: "hierarchy",
                ..
            })
        ));
    }

    #[test]
    fn unterminated_block_is_rejected() {
        let text = &WAVE[..WAVE.rfind("}\n").unwrap()];
        assert!(matches!(
            Md5Animation::parse(text, "broken"),
            Err(Md5Error::UnexpectedEof { block: "frame", .. })
        ));
    }

    #[test]
    fn summary_reflects_the_file() {
        let summary = wave().summary();
        assert_eq!(summary.frame_count, 2);
        assert_eq!(summary.joint_count, 2);
        assert_eq!(summary.frame_rate, 10);
        assert_eq!(summary.first_bound, Some(([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0])));
    }
}
