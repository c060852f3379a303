use std::path::Path;
use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::error::{Error, Result};
use super::multi_label::MultiLabel;
use super::sample_struct::{MultiLabelSample, SparseRow};


/// A struct that returns [`MultiLabelSample`].
/// 
/// Each line of a multi-label SVMLight format file has the form
/// ```txt
/// l1,l2,... index:value index:value ...
/// ```
/// where `l1,l2,...` are the 0-based classes of the example.
/// The label list is omitted for an example without classes.
/// Feature indices are 0-based.
/// Blank lines and lines starting with `#` are skipped.
/// 
/// # Example
/// ```no_run
/// use minilabels::SampleReader;
/// let train = SampleReader::new()
///     .file("/path/to/train.svm")
///     .read()
///     .unwrap();
/// let test = SampleReader::new()
///     .file("/path/to/test.svm")
///     .n_classes(train.n_classes())
///     .n_features(train.shape().1)
///     .read()
///     .unwrap();
/// ```
pub struct SampleReader<P> {
    file: Option<P>,
    n_classes: usize,
    n_features: usize,
}


impl<P> SampleReader<P> {
    /// Construct a new instance of [`SampleReader`].
    pub fn new() -> Self {
        Self { file: None, n_classes: 0, n_features: 0, }
    }


    /// Set the minimum number of classes.
    /// Use this to read a test sample with the shape of the training one.
    pub fn n_classes(mut self, n_classes: usize) -> Self {
        self.n_classes = n_classes;
        self
    }


    /// Set the minimum number of features.
    pub fn n_features(mut self, n_features: usize) -> Self {
        self.n_features = n_features;
        self
    }


    /// Parse a sample from any buffered reader.
    pub fn read_from<R: BufRead>(&self, reader: R) -> Result<MultiLabelSample> {
        let mut rows = Vec::new();
        let mut labels = Vec::new();

        for (k, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') { continue; }

            let (row, multi_label) = parse_line(line, k + 1)?;
            rows.push(row);
            labels.push(multi_label);
        }

        let sample = MultiLabelSample::from_rows(
            rows, labels, self.n_features, self.n_classes,
        );
        Ok(sample)
    }
}


impl<P> Default for SampleReader<P> {
    fn default() -> Self {
        Self::new()
    }
}


impl<P> SampleReader<P>
    where P: AsRef<Path>
{
    /// Set the file name.
    pub fn file(mut self, file: P) -> Self {
        self.file = Some(file);
        self
    }


    /// Reads the file based on the arguments.
    /// This method consumes `self.`
    pub fn read(self) -> Result<MultiLabelSample> {
        let file = self.file.as_ref()
            .expect("The file name for svmlight is not set");
        let file = File::open(file)?;
        self.read_from(BufReader::new(file))
    }
}


/// Parse one non-empty line.
fn parse_line(line: &str, line_no: usize) -> Result<(SparseRow, MultiLabel)> {
    let mut words = line.split_whitespace().peekable();

    let mut multi_label = MultiLabel::new();
    if let Some(first) = words.peek() {
        if !first.contains(':') {
            for label in first.split(',').filter(|l| !l.is_empty()) {
                let label = label.trim().parse::<usize>()
                    .map_err(|e| Error::SampleFormat {
                        line: line_no,
                        message: format!("bad label `{label}`: {e}"),
                    })?;
                multi_label.add_label(label);
            }
            words.next();
        }
    }

    let pairs = words.map(|word| index_and_feature(word, line_no))
        .collect::<Result<Vec<_>>>()?;

    Ok((SparseRow::new(pairs), multi_label))
}


/// Parse the following type of `str` to the pair of `(usize, f64)`.
/// `index:value`, where `index: usize` and `value: f64`.
fn index_and_feature(word: &str, line_no: usize) -> Result<(usize, f64)> {
    let malformed = |message: String| Error::SampleFormat {
        line: line_no, message,
    };

    let (i, x) = word.split_once(':')
        .ok_or_else(|| malformed(format!("expected `index:value`, got `{word}`")))?;
    let i = i.trim().parse::<usize>()
        .map_err(|e| malformed(format!("bad index in `{word}`: {e}")))?;
    let x = x.trim().parse::<f64>()
        .map_err(|e| malformed(format!("bad value in `{word}`: {e}")))?;

    Ok((i, x))
}


#[cfg(test)]
mod tests {
    use super::*;

    fn reader() -> SampleReader<&'static str> {
        SampleReader::new()
    }

    #[test]
    fn test_read_labels_and_features() {
        let text = "\
            # comment\n\
            0,2 0:1.0 3:0.5\n\
            \n\
            1 1:2.0\n\
            2:1.5\n";
        let sample = reader().read_from(text.as_bytes()).unwrap();

        assert_eq!(sample.shape(), (3, 4));
        assert_eq!(sample.n_classes(), 3);
        assert_eq!(sample.labels()[0], MultiLabel::from(vec![0, 2]));
        assert_eq!(sample.labels()[1], MultiLabel::from(vec![1]));
        assert!(sample.labels()[2].is_empty());
        assert_eq!(sample.row(0).get(3), 0.5);
        assert_eq!(sample.row(2).get(2), 1.5);
    }

    #[test]
    fn test_minimum_shape() {
        let sample = reader()
            .n_classes(10)
            .n_features(20)
            .read_from("0 0:1.0\n".as_bytes())
            .unwrap();
        assert_eq!(sample.shape(), (1, 20));
        assert_eq!(sample.n_classes(), 10);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let err = reader()
            .read_from("0 0:1.0\n1 x:2.0\n".as_bytes())
            .unwrap_err();
        match err {
            Error::SampleFormat { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
