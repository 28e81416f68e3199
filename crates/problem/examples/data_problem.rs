use egobox_doe::{Lhs, SamplingMethod};
use ndarray::{Array2, Zip, array};
use ndarray_rand::rand::SeedableRng;
use paretobox_problem::{
    DataProblem, ObjectiveDataset, ObjectiveModelSpec, Problem, ScalarConstraint,
};
use paretobox_surrogate::{GpSurrogateParams, LipschitzianParams};
use rand_xoshiro::Xoshiro256Plus;

fn main() {
    env_logger::init();

    // f1 = a + b, f2 = a * b sampled over [0, 1]^2
    let xlimits = array![[0., 1.], [0., 1.]];
    let xt = Lhs::new(&xlimits)
        .with_rng(Xoshiro256Plus::seed_from_u64(42))
        .sample(50);
    let mut ft = Array2::zeros((xt.nrows(), 2));
    Zip::from(ft.rows_mut()).and(xt.rows()).for_each(|mut f, x| {
        f[0] = x[0] + x[1];
        f[1] = x[0] * x[1];
    });
    let dataset = ObjectiveDataset::new(xt, ft)
        .expect("valid dataset")
        .with_objective_names(vec!["sum".to_string(), "prod".to_string()])
        .expect("one name per objective");

    let mut problem = DataProblem::new(dataset)
        .expect("data problem")
        .with_constraints(vec![ScalarConstraint::new("sum <= 1.5", |_x, f| 1.5 - f[0])]);
    println!("Variable bounds:\n{}", problem.variable_bounds().unwrap());
    println!("Ideal = {}", problem.ideal().unwrap());
    println!("Nadir = {}", problem.nadir().unwrap());

    let query = array![[0.5, 0.3], [0.9, 0.9]];
    let res = problem.evaluate(&query.view()).expect("lookup");
    println!("Nearest samples:\n{}", res.objectives);

    problem
        .train(&[
            ObjectiveModelSpec::new(0, GpSurrogateParams::default()),
            ObjectiveModelSpec::new(1, LipschitzianParams::new()),
        ])
        .expect("surrogate training");
    problem.set_surrogate_evaluation(true);
    let res = problem.evaluate(&query.view()).expect("prediction");
    println!("Predictions:\n{}", res.objectives);
    println!("Uncertainties:\n{}", res.uncertainty);
    println!("Constraints:\n{}", res.constraints.unwrap());
}
