//! Stage files: a character grid describing the kitchen, optionally followed
//! by a legend that binds storages and cooking stations.
//!
//! ```text
//! XIIICRRX
//! I..V...A
//! T......A
//! XPSWWXXX
//!
//! storage 0,1 shrimp
//! utensil 6,0 oven
//! ```
//!
//! | Code | Tile |
//! |------|------|
//! | `X` | wall |
//! | `.` | floor |
//! | `V` | chef spawn |
//! | `C` | cutting station |
//! | `R` | cooking station |
//! | `A` | assembly station |
//! | `S` | serving station |
//! | `W` | washing station |
//! | `I` | ingredient storage |
//! | `P` | plate storage |
//! | `T` | trash |
//!
//! Short rows are padded with walls. Storages without a legend entry take
//! ingredient kinds round-robin in reading order; unbound cooking stations
//! alternate pot and pan. A `W` whose right (else lower) neighbour is an
//! unpaired `W` becomes a sink feeding that rack.

use crate::loader::DataLoadError;
use nimons_core::ingredient::IngredientKind;
use nimons_core::map::{GridPosition, KitchenMap, MapError};
use nimons_core::station::{
    AssemblyStation, CookingStation, CuttingStation, PlateStorageStation, ServingStation, Station,
    StorageStation, TrashStation, WashingStation,
};
use nimons_core::utensil::DeviceKind;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

const WALL: char = 'X';
const WASHING: char = 'W';

/// A parsed stage, ready to hand to a session.
#[derive(Debug, Clone)]
pub struct Stage {
    /// File stem of the stage file.
    pub id: String,
    pub map: KitchenMap,
}

/// Read and parse a stage file. The id is the file stem.
pub fn load_stage(path: &Path) -> Result<Stage, DataLoadError> {
    let text = std::fs::read_to_string(path)?;
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("stage")
        .to_string();
    let map = parse_stage(&text, path)?;
    info!(
        stage = %id,
        width = map.width(),
        height = map.height(),
        stations = map.stations().count(),
        spawns = map.spawns().len(),
        "stage loaded"
    );
    Ok(Stage { id, map })
}

// ===========================================================================
// Parsing
// ===========================================================================

#[derive(Debug, Default)]
struct Legend {
    storage: HashMap<GridPosition, IngredientKind>,
    utensils: HashMap<GridPosition, DeviceKind>,
}

/// Parse stage text into a map. `file` is only used for error context.
pub fn parse_stage(text: &str, file: &Path) -> Result<KitchenMap, DataLoadError> {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let start = lines
        .iter()
        .position(|l| !l.is_empty())
        .ok_or_else(|| DataLoadError::EmptyStage {
            file: file.to_path_buf(),
        })?;
    let end = lines[start..]
        .iter()
        .position(|l| l.is_empty())
        .map_or(lines.len(), |n| start + n);

    let rows: Vec<Vec<char>> = lines[start..end].iter().map(|l| l.chars().collect()).collect();
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let height = rows.len();
    let code_at = |pos: GridPosition| -> char {
        rows.get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
            .copied()
            .unwrap_or(WALL)
    };

    let legend = parse_legend(&lines[end..], end, &code_at, file)?;
    let map_err = |source: MapError| DataLoadError::Map {
        file: file.to_path_buf(),
        source,
    };

    let mut map = KitchenMap::new(width as u32, height as u32);
    let mut next_storage = 0usize;
    let mut next_device = 0usize;
    let kinds = IngredientKind::all();
    let defaults = [DeviceKind::BoilingPot, DeviceKind::FryingPan];

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let pos = GridPosition::new(x, y);
            let station = match code_at(pos) {
                '.' => None,
                WALL => {
                    map.set_wall(pos).map_err(map_err)?;
                    None
                }
                'V' => {
                    map.add_spawn(pos).map_err(map_err)?;
                    None
                }
                'C' => Some(Station::Cutting(CuttingStation::new())),
                'R' => {
                    let device = match legend.utensils.get(&pos) {
                        Some(&kind) => kind,
                        None => {
                            let kind = defaults[next_device % defaults.len()];
                            next_device += 1;
                            kind
                        }
                    };
                    Some(Station::Cooking(CookingStation::new(Some(device))))
                }
                'A' => Some(Station::Assembly(AssemblyStation::new())),
                'S' => Some(Station::Serving(ServingStation::new())),
                WASHING => Some(Station::Washing(WashingStation::sink())),
                'I' => {
                    let kind = match legend.storage.get(&pos) {
                        Some(&kind) => kind,
                        None => {
                            let kind = kinds[next_storage % kinds.len()];
                            next_storage += 1;
                            kind
                        }
                    };
                    Some(Station::IngredientStorage(StorageStation::new(kind)))
                }
                'P' => Some(Station::PlateStorage(PlateStorageStation::new())),
                'T' => Some(Station::Trash(TrashStation::new())),
                code => {
                    return Err(DataLoadError::UnknownStationCode {
                        file: file.to_path_buf(),
                        code,
                        x,
                        y,
                    });
                }
            };
            if let Some(station) = station {
                map.place_station(pos, station).map_err(map_err)?;
            }
        }
    }

    link_washing_pairs(&mut map, width, height, &code_at).map_err(map_err)?;
    Ok(map)
}

fn parse_legend(
    lines: &[&str],
    first_line: usize,
    code_at: &impl Fn(GridPosition) -> char,
    file: &Path,
) -> Result<Legend, DataLoadError> {
    let mut legend = Legend::default();

    for (n, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = first_line + n + 1;
        let bad = |detail: String| DataLoadError::Legend {
            file: file.to_path_buf(),
            line: line_no,
            detail,
        };

        let parts: Vec<&str> = line.split_whitespace().collect();
        let [keyword, coords, value] = parts.as_slice() else {
            return Err(bad(format!("expected '<storage|utensil> x,y <name>', got '{line}'")));
        };
        let pos = parse_coords(coords).ok_or_else(|| bad(format!("bad coordinates '{coords}'")))?;

        match *keyword {
            "storage" => {
                if code_at(pos) != 'I' {
                    return Err(bad(format!("no ingredient storage at {pos}")));
                }
                let kind = IngredientKind::from_name(value)
                    .ok_or_else(|| bad(format!("unknown ingredient '{value}'")))?;
                legend.storage.insert(pos, kind);
            }
            "utensil" => {
                if code_at(pos) != 'R' {
                    return Err(bad(format!("no cooking station at {pos}")));
                }
                let kind = DeviceKind::from_name(value)
                    .ok_or_else(|| bad(format!("unknown utensil '{value}'")))?;
                legend.utensils.insert(pos, kind);
            }
            other => return Err(bad(format!("unknown legend keyword '{other}'"))),
        }
    }

    Ok(legend)
}

fn parse_coords(text: &str) -> Option<GridPosition> {
    let (x, y) = text.split_once(',')?;
    Some(GridPosition::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// Pair each unpaired `W` with its right neighbour, else the one below.
fn link_washing_pairs(
    map: &mut KitchenMap,
    width: usize,
    height: usize,
    code_at: &impl Fn(GridPosition) -> char,
) -> Result<(), MapError> {
    let mut paired: HashSet<GridPosition> = HashSet::new();

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let sink = GridPosition::new(x, y);
            if code_at(sink) != WASHING || paired.contains(&sink) {
                continue;
            }
            let rack = [GridPosition::new(x + 1, y), GridPosition::new(x, y + 1)]
                .into_iter()
                .find(|p| code_at(*p) == WASHING && !paired.contains(p));
            if let Some(rack) = rack {
                map.link_washing(sink, rack)?;
                paired.insert(sink);
                paired.insert(rack);
            }
        }
    }
    Ok(())
}
