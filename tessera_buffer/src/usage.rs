// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Upload-frequency hint carried by a buffer.

/// How often the contents of a buffer are expected to change.
///
/// Consumers that mirror the buffer on a GPU pick their upload strategy from
/// this; the buffer itself behaves the same for every variant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BufferUsage {
    /// Written once, drawn many times.
    #[default]
    Static,
    /// Rewritten occasionally, drawn many times.
    Dynamic,
    /// Rewritten about as often as it is drawn.
    Stream,
}
