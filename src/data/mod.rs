/// Data layer: frame files, parsing, and the frame/stack types.
///
/// Architecture:
/// ```text
///  <dir>/<prefix>0.txt, <prefix>1.txt, …
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  scan directory → frame family (count derivation)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  SourceSet → ordered file paths
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Frame
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  Frame, Shape, Stack
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod source;
