//! Loading wide municipal tables from delimited text files.

mod reader;

pub use reader::{read_dataset, read_dataset_from_reader, CsvOptions, Encoding};
