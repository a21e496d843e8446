use crate::args::CalcArgs;
use crate::calc::{evaluate, format_result};
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::Result;

/// Evaluates an arithmetic expression. Does not need a data directory.
pub async fn calc(args: CalcArgs) -> Result<Out<f64>> {
    let value = evaluate(args.expression()).pub_result(ErrorType::Request)?;
    Ok(Out::new(
        format!("{} = {}", args.expression().trim(), format_result(value)),
        value,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::CalcError;

    #[tokio::test]
    async fn test_calc() {
        let out = calc(CalcArgs::new("(3000 + 4500) * 2")).await.unwrap();
        assert_eq!(out.message(), "(3000 + 4500) * 2 = 15000");
        assert_eq!(out.structure(), Some(&15000.0));
    }

    #[tokio::test]
    async fn test_calc_error() {
        let err = calc(CalcArgs::new("7 / 0")).await.unwrap_err();
        assert_eq!(err.to_string(), "request error");
        assert_eq!(err.downcast_ref::<CalcError>(), Some(&CalcError::DivisionByZero));
    }
}
