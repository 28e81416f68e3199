use linfa::prelude::*;
use ndarray::{Array, Array1, Array2, Axis, arr2, concatenate};
use paretobox_surrogate::{LipschitzianRegressor, Surrogate};

fn xsinx(x: &Array2<f64>) -> Array1<f64> {
    ((x - 3.5) * ((x - 3.5) / std::f64::consts::PI).mapv(|v| v.sin())).remove_axis(Axis(1))
}

fn main() {
    env_logger::init();

    let xt = arr2(&[[0.0], [5.0], [10.0], [15.0], [18.0], [20.0], [25.0]]);
    let yt = xsinx(&xt);

    println!("Train lipschitzian surrogate of 'xsinx' at {}", xt.column(0));
    let model = LipschitzianRegressor::params()
        .fit(&Dataset::new(xt, yt))
        .expect("Lipschitzian fitting");
    println!("{model}");

    let xtest = Array::linspace(0., 25., 26).insert_axis(Axis(1));
    let ytest = xsinx(&xtest);
    let (ypred, yhalf) = model
        .predict_with_uncertainty(&xtest.view())
        .expect("Lipschitzian prediction");

    println!("Compute prediction errors (x, err(x), half-width(x))");
    println!(
        "{}",
        concatenate![
            Axis(1),
            xtest,
            (ypred - ytest).insert_axis(Axis(1)),
            yhalf.insert_axis(Axis(1))
        ]
    );
}
