//! The mission table and how it is dealt when a game starts.

use burrow_protocol::File;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::RoomConfig;

/// File sizes (bandwidth cost), indexed by file number.
const SIZES: [i64; 10] = [23, 31, 29, 44, 53, 38, 63, 85, 89, 82];

/// Secrecy values (score), indexed by file number.
const SECRECY: [i64; 10] = [92, 57, 49, 68, 60, 43, 67, 84, 86, 72];

/// The standard ten-file mission table.
pub fn default_files() -> Vec<File> {
    SIZES
        .iter()
        .zip(SECRECY.iter())
        .enumerate()
        .map(|(i, (&size, &secrecy))| {
            File::new(format!("filename_{i}.txt"), size, secrecy)
        })
        .collect()
}

/// One member's share of the mission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allotment {
    pub bandwidth: i64,
    pub files: Vec<File>,
}

/// Deals the mission to `members` players.
///
/// Bandwidths are shuffled with `rng`; files go round-robin, so the
/// member at index 0 receives files 0, n, 2n, ... and earlier members
/// get the extra file when the table does not divide evenly.
pub fn deal(config: &RoomConfig, members: usize, rng: &mut StdRng) -> Vec<Allotment> {
    let mut bandwidths = config.bandwidths.clone();
    bandwidths.shuffle(rng);

    let mut allotments: Vec<Allotment> = bandwidths
        .into_iter()
        .take(members)
        .map(|bandwidth| Allotment {
            bandwidth,
            files: Vec::new(),
        })
        .collect();

    if allotments.is_empty() {
        return allotments;
    }
    let n = allotments.len();
    for (i, file) in config.files.iter().enumerate() {
        allotments[i % n].files.push(file.clone());
    }
    allotments
}

/// Builds the RNG a room shuffles with.
pub(crate) fn mission_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
