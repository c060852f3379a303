//! Struct `MultiLabelSample` represents a batch of sparse rows
//! annotated with label sets.

// Provides the label-set struct.
pub(crate) mod multi_label;
// Provides the sparse row and the sample struct.
pub(crate) mod sample_struct;

// Provides a struct that reads a file.
pub(crate) mod sample_reader;


pub use multi_label::MultiLabel;
pub use sample_reader::SampleReader;
pub use sample_struct::{
    MultiLabelSample,
    SparseRow,
};
