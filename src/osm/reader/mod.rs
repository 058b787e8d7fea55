// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use graph_builder::GraphBuilder;

use crate::GeoGraph;

mod graph_builder;
mod model;
mod xml;

/// Values of the `highway` tag of ways which are turned into edges by default.
pub const DEFAULT_HIGHWAYS: &[&str] = &[
    "motorway",
    "trunk",
    "primary",
    "secondary",
    "tertiary",
    "unclassified",
    "residential",
    "living_street",
    "motorway_link",
    "trunk_link",
    "primary_link",
    "secondary_link",
    "tertiary_link",
];

/// Format of the input OSM file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the content
    Unknown,

    /// Force uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    Xml,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,

    /// [OSM PBF](https://wiki.openstreetmap.org/wiki/PBF_Format). Recognized when
    /// guessing the format, but always rejected with [Error::UnsupportedFormat].
    Pbf,
}

impl FileFormat {
    /// Guesses the format of an OSM file based on its first few bytes.
    pub fn detect(head: &[u8]) -> Self {
        if head.starts_with(&[0x1f, 0x8b]) {
            FileFormat::XmlGz
        } else if head.starts_with(b"BZh") {
            FileFormat::XmlBz2
        } else if head.len() >= 15 && head[4..6] == [0x0a, 0x09] && &head[6..15] == b"OSMHeader" {
            FileFormat::Pbf
        } else {
            FileFormat::Xml
        }
    }
}

/// Additional controls for interpreting OSM data as a [GeoGraph].
#[derive(Debug, Clone, Copy)]
pub struct Options<'a> {
    /// Format of the input data. Defaults to [FileFormat::Unknown].
    pub file_format: FileFormat,

    /// Filter nodes by a specific bounding box. In order: left (min lon), bottom (min lat),
    /// right (max lon), top (max lat). Ignored if all values are set to zero, or at least one
    /// of them is not finite.
    pub bbox: [f64; 4],

    /// Values of the `highway` tag of ways to be turned into edges.
    /// Defaults to [DEFAULT_HIGHWAYS].
    pub highways: &'a [&'a str],

    /// Whether to [remove isolated vertices](GeoGraph::cleanup) once all features
    /// have been added. Defaults to `true`. Disable for all but the last load
    /// when combining multiple extracts into a single graph, so that vertices
    /// connected only by ways from a later extract are kept.
    pub prune_isolated: bool,
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self {
            file_format: FileFormat::Unknown,
            bbox: [0.0; 4],
            highways: DEFAULT_HIGHWAYS,
            prune_isolated: true,
        }
    }
}

/// Summary of a single load operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of nodes added to the graph (before pruning).
    pub vertices: usize,

    /// Number of edges added to the graph.
    pub edges: usize,

    /// Number of way segments skipped due to a missing endpoint.
    pub skipped_edges: usize,

    /// Number of vertices without any edges removed after loading.
    /// Always zero if [Options::prune_isolated] is disabled.
    pub pruned_vertices: usize,
}

/// Error which can occur when loading OSM data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unsupported file format: {0:?}")]
    UnsupportedFormat(FileFormat),
}

/// Parse OSM features from a reader into a [GeoGraph] as per the provided [Options].
///
/// The provided stream is always wrapped in a buffered reader. Unless disabled with
/// [Options::prune_isolated], isolated vertices (including any added to `g` before
/// this call) are [removed](GeoGraph::cleanup) once all features have been added.
pub fn load_from_io<R: io::Read>(
    g: &mut GeoGraph,
    options: &Options<'_>,
    reader: R,
) -> Result<LoadStats, Error> {
    let mut b = io::BufReader::new(reader);

    let format = match options.file_format {
        FileFormat::Unknown => {
            let format = FileFormat::detect(b.fill_buf()?);
            log::debug!("detected input format: {:?}", format);
            format
        }
        format => format,
    };

    match format {
        FileFormat::Xml => build(g, options, xml::Reader::from_io(b)),

        FileFormat::XmlGz => {
            let d = flate2::read::MultiGzDecoder::new(b);
            build(g, options, xml::Reader::from_io(io::BufReader::new(d)))
        }

        FileFormat::XmlBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(b);
            build(g, options, xml::Reader::from_io(io::BufReader::new(d)))
        }

        FileFormat::Pbf | FileFormat::Unknown => Err(Error::UnsupportedFormat(format)),
    }
}

/// Parse OSM features from a file at the provided path into a [GeoGraph] as per the provided [Options].
pub fn load_from_file<P: AsRef<Path>>(
    g: &mut GeoGraph,
    options: &Options<'_>,
    path: P,
) -> Result<LoadStats, Error> {
    let f = File::open(path)?;
    load_from_io(g, options, f)
}

/// Parse OSM features from a static buffer into a [GeoGraph] as per the provided [Options].
pub fn load_from_buffer(
    g: &mut GeoGraph,
    options: &Options<'_>,
    data: &[u8],
) -> Result<LoadStats, Error> {
    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(data),
        format => format,
    };

    if format == FileFormat::Xml {
        // Fast path is available for in-memory XML data
        build(g, options, xml::Reader::from_buffer(data))
    } else {
        load_from_io(g, options, io::Cursor::new(data))
    }
}

fn build<I>(g: &mut GeoGraph, options: &Options<'_>, features: I) -> Result<LoadStats, Error>
where
    I: Iterator<Item = Result<model::Feature, quick_xml::Error>>,
{
    Ok(GraphBuilder::new(g, options).add_features(features)?)
}
