use std::path::Path;

use regex::Regex;

/// The sequence and position within it that a PNG frame's file name encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FrameName {
    pub sequence: String,
    pub number: u64,
}

/// Given the path to a PNG frame, works out which sequence it belongs to and
/// where in that sequence it goes.
///
/// Examples of the convention:
///
/// - walk_0.png (walk, 0)
/// - walk_12.png (walk, 12)
/// - walk_left_007.png (walk, 7)
/// - run_frame3.png (run, 3)
///
/// Returns `None` if no run of digits follows the first underscore.
pub(crate) fn parse_frame_name<P: AsRef<Path>>(path: P) -> Option<FrameName> {
    lazy_static::lazy_static! {
        static ref FRAME_PATTERN: Regex = Regex::new(r"^([^_]*)_[^0-9]*([0-9]+)").unwrap();
    }

    let path = path.as_ref();
    let stem = path.file_stem()?.to_string_lossy();

    let captures = FRAME_PATTERN.captures(&stem)?;
    let sequence = captures.get(1)?.as_str().to_owned();

    let number = match captures.get(2)?.as_str().parse() {
        Ok(number) => number,
        Err(_) => {
            log::warn!("Frame number in {} is too large", path.display());
            return None;
        }
    };

    Some(FrameName { sequence, number })
}
