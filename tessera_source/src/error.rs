// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for sources.

use tessera_geom::GeomError;
use tessera_index::IndexError;

/// Failures reported by [`LineStringSource`](crate::LineStringSource).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The geometry collection rejected the call.
    #[error(transparent)]
    Geom(#[from] GeomError),
    /// The spatial index rejected the call.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Result alias for source operations.
pub type Result<T> = core::result::Result<T, SourceError>;
