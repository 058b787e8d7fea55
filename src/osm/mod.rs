// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Loading [GeoGraphs](crate::GeoGraph) from [OpenStreetMap](https://www.openstreetmap.org/)
//! XML data.

mod reader;

pub use reader::{
    load_from_buffer, load_from_file, load_from_io, Error, FileFormat, LoadStats, Options,
    DEFAULT_HIGHWAYS,
};
