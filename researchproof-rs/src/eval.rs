//! The definitional-equality evaluator used by `Refl` proofs.
//!
//! Terms are reduced bottom-up: every argument of an application is evaluated
//! before the head is dispatched, including both branches of `ifThenElse`.
//! There are no user definitions, so the only functions are the fixed builtins
//! listed in [`BUILTINS`], plus lambdas passed to `map` and `filter`.
//!
//! Free variables do not make evaluation fail.  They evaluate to
//! [`Value::Unknown`], and any builtin applied to an unknown argument returns
//! unknown without looking at its other arguments.  Whether a stuck value is
//! acceptable is for the caller to decide.

use crate::diag::EvalError;
use crate::syntax::Term;
use crate::util::HashMap;
use itertools::Itertools;
use log::trace;
use std::fmt;

/// Variable bindings in scope during evaluation.
pub type Env = HashMap<String, Value>;

/// Every function name the evaluator knows how to apply.
pub const BUILTINS: &[&str] = &[
    "S", "Cons", "plus", "mult", "pow", "pred", "double", "sub", "min", "max", "isZero", "even",
    "odd", "leq", "lt", "eqNat", "not", "and", "or", "xor", "ifThenElse", "append", "length",
    "reverse", "snoc", "concat", "replicate", "map", "filter",
];

/// Builtins which may be mentioned without arguments and passed to `map` or
/// `filter`.  All of them are unary.
pub const CALLABLES: &[&str] = &[
    "S", "pred", "double", "isZero", "not", "even", "odd", "length", "reverse", "concat",
];

/// `replicate` refuses to build lists longer than this.
const REPLICATE_LIMIT: u64 = 1 << 20;

/// A lambda together with the bindings visible where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closure {
    /// The bound name.
    pub param: String,
    /// The unevaluated body.
    pub body: Term,
    /// Captured bindings.
    pub env: Env,
}

/// The result of evaluating a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A natural number.
    Nat(u64),
    /// A boolean.
    Bool(bool),
    /// A list; equality is elementwise and order-sensitive.
    List(Vec<Value>),
    /// A builtin mentioned by name.
    Callable(&'static str),
    /// An unapplied lambda.
    Lambda(Box<Closure>),
    /// A stuck value, naming the free variable or function it is stuck on.
    Unknown(String),
}

impl Value {
    /// A name for this value's variant, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Nat(_) => "Nat",
            Value::Bool(_) => "Bool",
            Value::List(_) => "List",
            Value::Callable(_) => "Callable",
            Value::Lambda(_) => "Lambda",
            Value::Unknown(_) => "Unknown",
        }
    }

    /// Whether this value, or any list element within it, is unknown.
    #[must_use]
    pub fn is_stuck(&self) -> bool {
        match self {
            Value::Unknown(_) => true,
            Value::List(items) => items.iter().any(Value::is_stuck),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nat(n) => write!(f, "{n}"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::List(items) => write!(f, "[{}]", items.iter().format(", ")),
            Value::Callable(name) => f.write_str(name),
            Value::Lambda(closure) => write!(f, "\\{} => {}", closure.param, closure.body),
            Value::Unknown(name) => write!(f, "?{name}"),
        }
    }
}

fn callable(name: &str) -> Option<Value> {
    CALLABLES
        .iter()
        .find(|&&builtin| builtin == name)
        .map(|&builtin| Value::Callable(builtin))
}

/// Evaluate `term` under `env`.
///
/// # Errors
///
/// Fails when a constant has no value, a name which is neither bound nor a
/// builtin is applied, a non-function is applied, or a builtin receives the
/// wrong number or kind of arguments.
pub fn evaluate(term: &Term, env: &Env) -> Result<Value, EvalError> {
    match term {
        Term::Const(name) => match name.as_str() {
            "Z" => Ok(Value::Nat(0)),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "Nil" => Ok(Value::List(vec![])),
            _ => callable(name).ok_or_else(|| EvalError::UnknownConstant(name.clone())),
        },
        Term::Var(name) => Ok(env
            .get(name)
            .cloned()
            .or_else(|| callable(name))
            .unwrap_or_else(|| Value::Unknown(name.clone()))),
        Term::Lambda(param, body) => Ok(Value::Lambda(Box::new(Closure {
            param: param.clone(),
            body: (**body).clone(),
            env: env.clone(),
        }))),
        Term::App(head, args) => {
            let args = args
                .iter()
                .map(|arg| evaluate(arg, env))
                .collect::<Result<Vec<_>, _>>()?;
            match env.get(head) {
                Some(func) => args
                    .into_iter()
                    .try_fold(func.clone(), |func, arg| apply_value(func, arg)),
                None => apply_builtin(head, args),
            }
        }
    }
}

/// Apply a function value to one argument.
///
/// # Errors
///
/// Fails if `func` is not a callable, a closure, or unknown, and otherwise as
/// for [`evaluate`].
pub fn apply_value(func: Value, arg: Value) -> Result<Value, EvalError> {
    match func {
        Value::Callable(name) => apply_builtin(name, vec![arg]),
        Value::Lambda(closure) => {
            let Closure {
                param,
                body,
                mut env,
            } = *closure;
            env.insert(param, arg);
            evaluate(&body, &env)
        }
        Value::Unknown(name) => Ok(Value::Unknown(name)),
        other => Err(EvalError::NotCallable(other.kind())),
    }
}

fn take<const N: usize>(name: &str, args: Vec<Value>) -> Result<[Value; N], EvalError> {
    let found = args.len();
    args.try_into().map_err(|_| EvalError::Arity {
        function: name.to_owned(),
        expected: N,
        found,
    })
}

fn mismatch(name: &str, expected: &'static str, found: &Value) -> EvalError {
    EvalError::TypeMismatch {
        function: name.to_owned(),
        expected,
        found: found.kind(),
    }
}

fn nat(name: &str, value: &Value) -> Result<u64, EvalError> {
    match value {
        Value::Nat(n) => Ok(*n),
        other => Err(mismatch(name, "Nat", other)),
    }
}

fn boolean(name: &str, value: &Value) -> Result<bool, EvalError> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(mismatch(name, "Bool", other)),
    }
}

fn list(name: &str, value: Value) -> Result<Vec<Value>, EvalError> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(mismatch(name, "List", &other)),
    }
}

fn overflow(name: &str) -> EvalError {
    EvalError::Overflow(name.to_owned())
}

fn nat_op(
    name: &str,
    args: Vec<Value>,
    op: impl FnOnce(u64, u64) -> Option<u64>,
) -> Result<Value, EvalError> {
    let [a, b] = take::<2>(name, args)?;
    op(nat(name, &a)?, nat(name, &b)?)
        .map(Value::Nat)
        .ok_or_else(|| overflow(name))
}

fn nat_cmp(
    name: &str,
    args: Vec<Value>,
    op: impl FnOnce(u64, u64) -> bool,
) -> Result<Value, EvalError> {
    let [a, b] = take::<2>(name, args)?;
    Ok(Value::Bool(op(nat(name, &a)?, nat(name, &b)?)))
}

fn nat_test(
    name: &str,
    args: Vec<Value>,
    op: impl FnOnce(u64) -> bool,
) -> Result<Value, EvalError> {
    let [a] = take::<1>(name, args)?;
    Ok(Value::Bool(op(nat(name, &a)?)))
}

fn bool_op(
    name: &str,
    args: Vec<Value>,
    op: impl FnOnce(bool, bool) -> bool,
) -> Result<Value, EvalError> {
    let [a, b] = take::<2>(name, args)?;
    Ok(Value::Bool(op(boolean(name, &a)?, boolean(name, &b)?)))
}

/// Apply the builtin `name` to already-evaluated arguments.
///
/// # Errors
///
/// Fails with [`EvalError::UnknownFunction`] if `name` is not a builtin, and
/// with arity, kind, or overflow errors from the builtin itself.  Never fails
/// if an argument is unknown.
pub fn apply_builtin(name: &str, args: Vec<Value>) -> Result<Value, EvalError> {
    if args.iter().any(|arg| matches!(arg, Value::Unknown(_))) {
        return Ok(Value::Unknown(name.to_owned()));
    }
    trace!("apply {name} to {} argument(s)", args.len());

    match name {
        "S" => {
            let [n] = take::<1>(name, args)?;
            nat(name, &n)?
                .checked_add(1)
                .map(Value::Nat)
                .ok_or_else(|| overflow(name))
        }
        "Cons" => {
            let [head, tail] = take::<2>(name, args)?;
            let mut items = list(name, tail)?;
            items.insert(0, head);
            Ok(Value::List(items))
        }
        "plus" => nat_op(name, args, u64::checked_add),
        "mult" => nat_op(name, args, u64::checked_mul),
        "pow" => nat_op(name, args, |base, exp| {
            u32::try_from(exp).ok().and_then(|exp| base.checked_pow(exp))
        }),
        "sub" => nat_op(name, args, |a, b| Some(a.saturating_sub(b))),
        "min" => nat_op(name, args, |a, b| Some(a.min(b))),
        "max" => nat_op(name, args, |a, b| Some(a.max(b))),
        "pred" => {
            let [n] = take::<1>(name, args)?;
            Ok(Value::Nat(nat(name, &n)?.saturating_sub(1)))
        }
        "double" => {
            let [n] = take::<1>(name, args)?;
            nat(name, &n)?
                .checked_mul(2)
                .map(Value::Nat)
                .ok_or_else(|| overflow(name))
        }
        "isZero" => nat_test(name, args, |n| n == 0),
        "even" => nat_test(name, args, |n| n % 2 == 0),
        "odd" => nat_test(name, args, |n| n % 2 == 1),
        "leq" => nat_cmp(name, args, |a, b| a <= b),
        "lt" => nat_cmp(name, args, |a, b| a < b),
        "eqNat" => nat_cmp(name, args, |a, b| a == b),
        "not" => {
            let [b] = take::<1>(name, args)?;
            Ok(Value::Bool(!boolean(name, &b)?))
        }
        "and" => bool_op(name, args, |a, b| a && b),
        "or" => bool_op(name, args, |a, b| a || b),
        "xor" => bool_op(name, args, |a, b| a ^ b),
        "ifThenElse" => {
            // both branches were evaluated before we got here
            let [cond, then, otherwise] = take::<3>(name, args)?;
            Ok(if boolean(name, &cond)? { then } else { otherwise })
        }
        "append" => {
            let [left, right] = take::<2>(name, args)?;
            let mut items = list(name, left)?;
            items.extend(list(name, right)?);
            Ok(Value::List(items))
        }
        "length" => {
            let [items] = take::<1>(name, args)?;
            let len = list(name, items)?.len();
            u64::try_from(len)
                .map(Value::Nat)
                .map_err(|_| overflow(name))
        }
        "reverse" => {
            let [items] = take::<1>(name, args)?;
            let mut items = list(name, items)?;
            items.reverse();
            Ok(Value::List(items))
        }
        "snoc" => {
            let [items, last] = take::<2>(name, args)?;
            let mut items = list(name, items)?;
            items.push(last);
            Ok(Value::List(items))
        }
        "concat" => {
            let [lists] = take::<1>(name, args)?;
            let mut items = vec![];
            for sublist in list(name, lists)? {
                if let Value::Unknown(_) = sublist {
                    return Ok(Value::Unknown(name.to_owned()));
                }
                items.extend(list(name, sublist)?);
            }
            Ok(Value::List(items))
        }
        "replicate" => {
            let [count, item] = take::<2>(name, args)?;
            let count = nat(name, &count)?;
            if count > REPLICATE_LIMIT {
                return Err(overflow(name));
            }
            Ok(Value::List(vec![item; count as usize]))
        }
        "map" => {
            let [func, items] = take::<2>(name, args)?;
            list(name, items)?
                .into_iter()
                .map(|item| apply_value(func.clone(), item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List)
        }
        "filter" => {
            let [pred, items] = take::<2>(name, args)?;
            let mut kept = vec![];
            for item in list(name, items)? {
                match apply_value(pred.clone(), item.clone())? {
                    Value::Bool(true) => kept.push(item),
                    Value::Bool(false) => {}
                    Value::Unknown(_) => return Ok(Value::Unknown(name.to_owned())),
                    other => return Err(mismatch(name, "Bool", &other)),
                }
            }
            Ok(Value::List(kept))
        }
        _ => Err(EvalError::UnknownFunction(name.to_owned())),
    }
}
