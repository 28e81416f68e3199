use crate::errors::{ProblemError, Result};
use log::debug;
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Data, Ix2, s};
use ndarray_stats::QuantileExt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Mapping of table columns to decision variables and objectives
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum DataColumns {
    /// The first n columns are decision variables, the remaining ones are objectives
    Split(usize),
    /// Columns are taken by name, in the given order
    Named {
        /// Decision variable column names
        variables: Vec<String>,
        /// Objective column names
        objectives: Vec<String>,
    },
}

/// Pre-computed samples of a multiobjective problem.
///
/// The ith row of `decision_vectors` is the solution whose objective values
/// are the ith row of `objective_vectors`. A dataset has at least one sample,
/// one variable and one objective, and only finite values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct ObjectiveDataset {
    decision_vectors: Array2<f64>,
    objective_vectors: Array2<f64>,
    variable_names: Vec<String>,
    objective_names: Vec<String>,
}

fn default_names(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{prefix}{i}")).collect()
}

impl ObjectiveDataset {
    /// Constructor given (n, n_of_variables) decision vectors and
    /// (n, n_of_objectives) objective vectors.
    ///
    /// Variables are named `x1, x2, ...` and objectives `f1, f2, ...`.
    pub fn new(decision_vectors: Array2<f64>, objective_vectors: Array2<f64>) -> Result<Self> {
        if decision_vectors.nrows() == 0 {
            return Err(ProblemError::ConfigurationError(
                "Dataset should contain at least one sample".to_string(),
            ));
        }
        if decision_vectors.nrows() != objective_vectors.nrows() {
            return Err(ProblemError::ConfigurationError(format!(
                "Dataset has {} decision vectors but {} objective vectors",
                decision_vectors.nrows(),
                objective_vectors.nrows()
            )));
        }
        if decision_vectors.ncols() == 0 || objective_vectors.ncols() == 0 {
            return Err(ProblemError::ConfigurationError(format!(
                "Dataset should have at least one variable and one objective, got {} and {}",
                decision_vectors.ncols(),
                objective_vectors.ncols()
            )));
        }
        if decision_vectors
            .iter()
            .chain(objective_vectors.iter())
            .any(|v| !v.is_finite())
        {
            return Err(ProblemError::ConfigurationError(
                "Dataset should only contain finite values".to_string(),
            ));
        }
        let variable_names = default_names("x", decision_vectors.ncols());
        let objective_names = default_names("f", objective_vectors.ncols());
        Ok(ObjectiveDataset {
            decision_vectors,
            objective_vectors,
            variable_names,
            objective_names,
        })
    }

    /// Constructor given (decision vector, objective vector) records
    pub fn from_records(records: &[(Vec<f64>, Vec<f64>)]) -> Result<Self> {
        let Some((x0, f0)) = records.first() else {
            return Err(ProblemError::ConfigurationError(
                "Dataset should contain at least one sample".to_string(),
            ));
        };
        let (nx, nf) = (x0.len(), f0.len());
        let mut xs = Vec::with_capacity(records.len() * nx);
        let mut fs = Vec::with_capacity(records.len() * nf);
        for (i, (x, f)) in records.iter().enumerate() {
            if x.len() != nx {
                return Err(ProblemError::ConfigurationError(format!(
                    "Record {i} has {} variables, expected {nx}",
                    x.len()
                )));
            }
            if f.len() != nf {
                return Err(ProblemError::ConfigurationError(format!(
                    "Record {i} has {} objectives, expected {nf}",
                    f.len()
                )));
            }
            xs.extend_from_slice(x);
            fs.extend_from_slice(f);
        }
        Self::new(
            to_matrix(records.len(), nx, xs)?,
            to_matrix(records.len(), nf, fs)?,
        )
    }

    /// Constructor given a (n, n_of_variables + n_of_objectives) table where the first
    /// `n_of_variables` columns hold decision variables and the remaining ones objectives.
    pub fn from_table(
        table: &ArrayBase<impl Data<Elem = f64>, Ix2>,
        n_of_variables: usize,
    ) -> Result<Self> {
        if n_of_variables == 0 || n_of_variables >= table.ncols() {
            return Err(ProblemError::ConfigurationError(format!(
                "Column split point {n_of_variables} should be in [1, {}[",
                table.ncols()
            )));
        }
        Self::new(
            table.slice(s![.., ..n_of_variables]).to_owned(),
            table.slice(s![.., n_of_variables..]).to_owned(),
        )
    }

    /// Read a dataset from csv data with a header row.
    ///
    /// Column names are used as variable and objective names.
    pub fn from_csv<R: Read>(reader: R, columns: &DataColumns) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(String::from).collect();

        let (var_cols, obj_cols) = match columns {
            DataColumns::Split(n) => {
                if *n == 0 || *n >= headers.len() {
                    return Err(ProblemError::ConfigurationError(format!(
                        "Column split point {n} should be in [1, {}[",
                        headers.len()
                    )));
                }
                ((0..*n).collect::<Vec<_>>(), (*n..headers.len()).collect())
            }
            DataColumns::Named {
                variables,
                objectives,
            } => (
                column_indices(&headers, variables)?,
                column_indices(&headers, objectives)?,
            ),
        };

        let mut xs = vec![];
        let mut fs = vec![];
        let mut n_rows = 0;
        for record in rdr.records() {
            let record = record?;
            for (cols, values) in [(&var_cols, &mut xs), (&obj_cols, &mut fs)] {
                for &col in cols.iter() {
                    let field = record.get(col).unwrap_or_default();
                    let value = field.parse::<f64>().map_err(|err| {
                        ProblemError::ConfigurationError(format!(
                            "Invalid value '{field}' in row {}, column '{}': {err}",
                            n_rows + 1,
                            headers[col]
                        ))
                    })?;
                    values.push(value);
                }
            }
            n_rows += 1;
        }
        debug!("Read {n_rows} samples from csv data");

        let dataset = Self::new(
            to_matrix(n_rows, var_cols.len(), xs)?,
            to_matrix(n_rows, obj_cols.len(), fs)?,
        )?;
        let variable_names = var_cols.iter().map(|&c| headers[c].clone()).collect();
        let objective_names = obj_cols.iter().map(|&c| headers[c].clone()).collect();
        dataset
            .with_variable_names(variable_names)?
            .with_objective_names(objective_names)
    }

    /// Read a dataset from the csv file at given path, see [ObjectiveDataset::from_csv].
    pub fn from_csv_path<P: AsRef<Path>>(path: P, columns: &DataColumns) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        debug!("Reading dataset from {:?}", path.as_ref());
        Self::from_csv(file, columns)
    }

    /// Set decision variable names
    pub fn with_variable_names(mut self, names: Vec<String>) -> Result<Self> {
        if names.len() != self.n_of_variables() {
            return Err(ProblemError::ConfigurationError(format!(
                "{} variable names given for {} variables",
                names.len(),
                self.n_of_variables()
            )));
        }
        self.variable_names = names;
        Ok(self)
    }

    /// Set objective names
    pub fn with_objective_names(mut self, names: Vec<String>) -> Result<Self> {
        if names.len() != self.n_of_objectives() {
            return Err(ProblemError::ConfigurationError(format!(
                "{} objective names given for {} objectives",
                names.len(),
                self.n_of_objectives()
            )));
        }
        self.objective_names = names;
        Ok(self)
    }

    /// Number of samples
    pub fn n_samples(&self) -> usize {
        self.decision_vectors.nrows()
    }

    /// Number of decision variables
    pub fn n_of_variables(&self) -> usize {
        self.decision_vectors.ncols()
    }

    /// Number of objectives
    pub fn n_of_objectives(&self) -> usize {
        self.objective_vectors.ncols()
    }

    /// Decision vectors as a (n, n_of_variables) matrix
    pub fn decision_vectors(&self) -> ArrayView2<'_, f64> {
        self.decision_vectors.view()
    }

    /// Objective vectors as a (n, n_of_objectives) matrix
    pub fn objective_vectors(&self) -> ArrayView2<'_, f64> {
        self.objective_vectors.view()
    }

    /// Decision variable names
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// Objective names
    pub fn objective_names(&self) -> &[String] {
        &self.objective_names
    }

    /// Smallest value of each objective in the data
    pub fn ideal(&self) -> Array1<f64> {
        self.objective_vectors
            .columns()
            .into_iter()
            .map(|col| *col.min_skipnan())
            .collect()
    }

    /// Largest value of each objective in the data
    pub fn nadir(&self) -> Array1<f64> {
        self.objective_vectors
            .columns()
            .into_iter()
            .map(|col| *col.max_skipnan())
            .collect()
    }

    /// Smallest and largest value of each decision variable as a (n_of_variables, 2) matrix
    pub fn variable_extent(&self) -> Array2<f64> {
        let mut extent = Array2::zeros((self.n_of_variables(), 2));
        for (j, col) in self.decision_vectors.columns().into_iter().enumerate() {
            extent[[j, 0]] = *col.min_skipnan();
            extent[[j, 1]] = *col.max_skipnan();
        }
        extent
    }
}

fn to_matrix(nrows: usize, ncols: usize, values: Vec<f64>) -> Result<Array2<f64>> {
    Array2::from_shape_vec((nrows, ncols), values)
        .map_err(|err| ProblemError::ConfigurationError(format!("Invalid data shape: {err}")))
}

fn column_indices(headers: &[String], names: &[String]) -> Result<Vec<usize>> {
    if names.is_empty() {
        return Err(ProblemError::ConfigurationError(
            "At least one column should be selected".to_string(),
        ));
    }
    names
        .iter()
        .map(|name| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                ProblemError::ConfigurationError(format!("Unknown column '{name}'"))
            })
        })
        .collect()
}
