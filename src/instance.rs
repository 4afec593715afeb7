//! # Problem Instances
//!
//! Loader for the coordinate-list subset of the TSPLIB format: a header of
//! `KEY : VALUE` lines (`NAME`, `COMMENT`, `DIMENSION`), a
//! `NODE_COORD_SECTION` of `index x y` triples with 1-based indices, and an
//! optional trailing `EOF` marker. The loader produces the city list and the
//! finished [`DistanceMatrix`] the engine consumes; the engine itself never
//! parses files.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::distance::DistanceMatrix;
use crate::error::{Result, ResultExt, TspError};

/// Position of a city on the map.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityPosition {
    pub x: f64,
    pub y: f64,
}

/// A parsed problem instance: identification, declared dimension and the
/// city coordinates.
#[derive(Clone, Debug)]
pub struct TspInstance {
    /// Identification of the problem.
    pub name: String,
    /// Free-form comment carried by the input file.
    pub comment: String,
    /// Number of cities.
    pub dimension: usize,
    /// City positions, indexed by 0-based city index.
    pub cities: Vec<CityPosition>,
}

impl TspInstance {
    /// Loads an instance from a file.
    ///
    /// # Errors
    ///
    /// Returns [`TspError::Io`] if the file cannot be opened and
    /// [`TspError::Problem`] if the contents are malformed (missing
    /// dimension, unparsable coordinates, or a coordinate count that does
    /// not match the declared dimension).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::parse(BufReader::new(file))
    }

    /// Parses an instance from any reader. See [`TspInstance::load`].
    pub fn parse<R: Read>(reader: R) -> Result<Self> {
        let mut name = String::new();
        let mut comment = String::new();
        let mut dimension: Option<usize> = None;
        let mut cities: Vec<(usize, CityPosition)> = Vec::new();
        let mut in_coord_section = false;

        for line in BufReader::new(reader).lines() {
            let line = line?;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }
            if trimmed == "EOF" {
                break;
            }
            if trimmed == "NODE_COORD_SECTION" {
                in_coord_section = true;
                continue;
            }

            if in_coord_section {
                cities.push(parse_coord_line(trimmed)?);
            } else if let Some((key, value)) = trimmed.split_once(':') {
                match key.trim() {
                    "NAME" => name = value.trim().to_string(),
                    "COMMENT" => comment = value.trim().to_string(),
                    "DIMENSION" => {
                        dimension = Some(
                            value
                                .trim()
                                .parse::<usize>()
                                .context("Failed to parse DIMENSION")?,
                        );
                    }
                    // TYPE, EDGE_WEIGHT_TYPE and friends are accepted and ignored.
                    _ => {}
                }
            }
        }

        let dimension = dimension.ok_or_else(|| {
            TspError::Problem("input file declares no DIMENSION".to_string())
        })?;

        if cities.len() != dimension {
            return Err(TspError::Problem(format!(
                "declared dimension is {} but {} city coordinates were found",
                dimension,
                cities.len()
            )));
        }

        let mut positions = vec![CityPosition { x: 0.0, y: 0.0 }; dimension];
        for (index, position) in cities {
            if index == 0 || index > dimension {
                return Err(TspError::Problem(format!(
                    "city index {} is outside 1..={}",
                    index, dimension
                )));
            }
            positions[index - 1] = position;
        }

        Ok(Self {
            name,
            comment,
            dimension,
            cities: positions,
        })
    }

    /// Builds the Euclidean distance matrix over this instance's cities.
    pub fn distance_matrix(&self) -> DistanceMatrix {
        DistanceMatrix::from_cities(&self.cities)
    }
}

fn parse_coord_line(line: &str) -> Result<(usize, CityPosition)> {
    let mut fields = line.split_whitespace();
    let index = fields
        .next()
        .ok_or_else(|| TspError::Problem(format!("malformed coordinate line: {:?}", line)))?
        .parse::<usize>()
        .context("Failed to parse city index")?;
    let x = fields
        .next()
        .ok_or_else(|| TspError::Problem(format!("malformed coordinate line: {:?}", line)))?
        .parse::<f64>()
        .context("Failed to parse X coordinate")?;
    let y = fields
        .next()
        .ok_or_else(|| TspError::Problem(format!("malformed coordinate line: {:?}", line)))?
        .parse::<f64>()
        .context("Failed to parse Y coordinate")?;

    Ok((index, CityPosition { x, y }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOY_INSTANCE: &str = "\
NAME : toy4
COMMENT : unit square
TYPE : TSP
DIMENSION : 4
EDGE_WEIGHT_TYPE : EUC_2D
NODE_COORD_SECTION
1 0 0
2 0 1
3 1 1
4 1 0
EOF
";

    #[test]
    fn test_parse_coordinate_instance() {
        let instance = TspInstance::parse(TOY_INSTANCE.as_bytes()).unwrap();

        assert_eq!(instance.name, "toy4");
        assert_eq!(instance.comment, "unit square");
        assert_eq!(instance.dimension, 4);
        assert_eq!(instance.cities[2], CityPosition { x: 1.0, y: 1.0 });

        let matrix = instance.distance_matrix();
        assert_eq!(matrix.dimension(), 4);
        assert!((matrix.tour_length(&[0, 1, 2, 3]) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_rejects_missing_dimension() {
        let input = "NAME : broken\nNODE_COORD_SECTION\n1 0 0\nEOF\n";
        let result = TspInstance::parse(input.as_bytes());
        assert!(matches!(result, Err(TspError::Problem(_))));
    }

    #[test]
    fn test_parse_rejects_coordinate_count_mismatch() {
        let input = "DIMENSION : 3\nNODE_COORD_SECTION\n1 0 0\n2 1 1\nEOF\n";
        let result = TspInstance::parse(input.as_bytes());
        assert!(matches!(result, Err(TspError::Problem(_))));
    }

    #[test]
    fn test_parse_rejects_out_of_range_city_index() {
        let input = "DIMENSION : 2\nNODE_COORD_SECTION\n1 0 0\n5 1 1\nEOF\n";
        let result = TspInstance::parse(input.as_bytes());
        assert!(matches!(result, Err(TspError::Problem(_))));
    }

    #[test]
    fn test_load_missing_file_is_an_io_error() {
        let result = TspInstance::load("/no/such/instance.tsp");
        assert!(matches!(result, Err(TspError::Io(_))));
    }

    #[test]
    fn test_parse_accepts_real_coordinates_without_eof() {
        let input = "DIMENSION : 2\nNODE_COORD_SECTION\n1 565.0 575.0\n2 25.0 185.0\n";
        let instance = TspInstance::parse(input.as_bytes()).unwrap();
        assert_eq!(instance.cities[0], CityPosition { x: 565.0, y: 575.0 });
    }
}
