//! `System.Math`: the numeric functions and constants spec.md §4.5 lists as
//! a MUST-have, all static and all operating on `float64` to keep the
//! native surface small. Constants are niladic methods rather than static
//! fields, consistent with every other host-backed member here.

use objectir::host::HostRegistry;
use objectir::module::{ClassRegistry, Primitive, TypeReference};
use objectir::value::Value;

use crate::support::{native_class, native_method};

fn f64_arg(args: &[Value], index: usize) -> objectir::VmResult<f64> {
    args.get(index)
        .ok_or_else(|| objectir::VmError::malformed_operand("missing argument"))?
        .to_f64()
}

pub fn register(registry: &mut ClassRegistry, host: &mut HostRegistry) {
    let f64_ty = || TypeReference::Primitive(Primitive::Float64);
    let class = native_class(
        "Math",
        "System",
        vec![
            native_method("PI", &[], f64_ty(), true),
            native_method("E", &[], f64_ty(), true),
            native_method("Tau", &[], f64_ty(), true),
            native_method("Sqrt", &[("x", f64_ty())], f64_ty(), true),
            native_method("Abs", &[("x", f64_ty())], f64_ty(), true),
            native_method("Floor", &[("x", f64_ty())], f64_ty(), true),
            native_method("Ceiling", &[("x", f64_ty())], f64_ty(), true),
            native_method("Truncate", &[("x", f64_ty())], f64_ty(), true),
            native_method("Sign", &[("x", f64_ty())], f64_ty(), true),
            native_method("Round", &[("x", f64_ty())], f64_ty(), true),
            native_method("Round", &[("x", f64_ty()), ("digits", f64_ty())], f64_ty(), true),
            native_method("Sin", &[("x", f64_ty())], f64_ty(), true),
            native_method("Cos", &[("x", f64_ty())], f64_ty(), true),
            native_method("Tan", &[("x", f64_ty())], f64_ty(), true),
            native_method("Asin", &[("x", f64_ty())], f64_ty(), true),
            native_method("Acos", &[("x", f64_ty())], f64_ty(), true),
            native_method("Atan", &[("x", f64_ty())], f64_ty(), true),
            native_method("Atan2", &[("y", f64_ty()), ("x", f64_ty())], f64_ty(), true),
            native_method("Sinh", &[("x", f64_ty())], f64_ty(), true),
            native_method("Cosh", &[("x", f64_ty())], f64_ty(), true),
            native_method("Tanh", &[("x", f64_ty())], f64_ty(), true),
            native_method("Exp", &[("x", f64_ty())], f64_ty(), true),
            native_method("Log", &[("x", f64_ty())], f64_ty(), true),
            native_method("Log", &[("x", f64_ty()), ("newBase", f64_ty())], f64_ty(), true),
            native_method("Log10", &[("x", f64_ty())], f64_ty(), true),
            native_method("Pow", &[("x", f64_ty()), ("y", f64_ty())], f64_ty(), true),
            native_method("Max", &[("x", f64_ty()), ("y", f64_ty())], f64_ty(), true),
            native_method("Min", &[("x", f64_ty()), ("y", f64_ty())], f64_ty(), true),
        ],
    );
    registry.register_class(class);

    host.register("System.Math.PI()", Box::new(|_this, _args, _interp| Ok(Value::Float64(std::f64::consts::PI))));
    host.register("System.Math.E()", Box::new(|_this, _args, _interp| Ok(Value::Float64(std::f64::consts::E))));
    host.register("System.Math.Tau()", Box::new(|_this, _args, _interp| Ok(Value::Float64(std::f64::consts::TAU))));

    host.register(
        "System.Math.Sqrt(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.sqrt()))),
    );
    host.register(
        "System.Math.Abs(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.abs()))),
    );
    host.register(
        "System.Math.Floor(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.floor()))),
    );
    host.register(
        "System.Math.Ceiling(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.ceil()))),
    );
    host.register(
        "System.Math.Truncate(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.trunc()))),
    );
    host.register(
        "System.Math.Sign(float64)",
        Box::new(|_this, args, _interp| {
            let x = f64_arg(args, 0)?;
            Ok(Value::Float64(if x > 0.0 { 1.0 } else if x < 0.0 { -1.0 } else { 0.0 }))
        }),
    );
    host.register(
        "System.Math.Round(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.round()))),
    );
    host.register(
        "System.Math.Round(float64,float64)",
        Box::new(|_this, args, _interp| {
            let x = f64_arg(args, 0)?;
            let digits = f64_arg(args, 1)?;
            let factor = 10f64.powf(digits);
            Ok(Value::Float64((x * factor).round() / factor))
        }),
    );
    host.register(
        "System.Math.Sin(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.sin()))),
    );
    host.register(
        "System.Math.Cos(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.cos()))),
    );
    host.register(
        "System.Math.Tan(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.tan()))),
    );
    host.register(
        "System.Math.Asin(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.asin()))),
    );
    host.register(
        "System.Math.Acos(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.acos()))),
    );
    host.register(
        "System.Math.Atan(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.atan()))),
    );
    host.register(
        "System.Math.Atan2(float64,float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.atan2(f64_arg(args, 1)?)))),
    );
    host.register(
        "System.Math.Sinh(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.sinh()))),
    );
    host.register(
        "System.Math.Cosh(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.cosh()))),
    );
    host.register(
        "System.Math.Tanh(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.tanh()))),
    );
    host.register(
        "System.Math.Exp(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.exp()))),
    );
    host.register(
        "System.Math.Log(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.ln()))),
    );
    host.register(
        "System.Math.Log(float64,float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.log(f64_arg(args, 1)?)))),
    );
    host.register(
        "System.Math.Log10(float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.log10()))),
    );
    host.register(
        "System.Math.Pow(float64,float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.powf(f64_arg(args, 1)?)))),
    );
    host.register(
        "System.Math.Max(float64,float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.max(f64_arg(args, 1)?)))),
    );
    host.register(
        "System.Math.Min(float64,float64)",
        Box::new(|_this, args, _interp| Ok(Value::Float64(f64_arg(args, 0)?.min(f64_arg(args, 1)?)))),
    );
}
