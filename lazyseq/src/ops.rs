//! The sequence operations on dynamic [`Value`]s.
//!
//! Every operation checks its arguments when it is called and returns a lazy
//! [`Value::Seq`]. Traversing the result re-drives the input from the front,
//! so a result can be traversed as often as its input can.
//!
//! Callables return [`error::Result`]; an error they return is yielded
//! unchanged by the traversal that triggered it, and that traversal ends.

use std::rc::Rc;

use crate::error::{self, Error, Expected};
use crate::flatten::Depth;
use crate::key::Key;
use crate::pairs::PairsExt;
use crate::partition::{Checked, Partition};
use crate::stream::{PairIter, Stream};
use crate::transform::Filter;
use crate::validate;
use crate::value::{Traversable, Value, Values};
use crate::zip::Zip;

fn lazy<F, I>(factory: F) -> Value
where
    F: Fn() -> I + 'static,
    I: Iterator<Item = error::Result<(Key, Value)>> + 'static,
{
    Value::Seq(Stream::new(factory))
}

// key positional output with the dynamic key type
fn renumbered<I>(iter: I) -> impl Iterator<Item = error::Result<(Key, Value)>>
where
    I: Iterator<Item = error::Result<(usize, Value)>>,
{
    iter.map(|pair| pair.map(|(index, value)| (Key::from(index), value)))
}

fn failed(error: Error) -> PairIter {
    Box::new(std::iter::once(Err(error)))
}

pub fn map<F>(f: F, seq: &Value) -> error::Result<Value>
where
    F: Fn(Value) -> error::Result<Value> + 'static,
{
    let source = validate::traversable(seq, 2)?;
    let f = Rc::new(f);
    Ok(lazy(move || {
        let f = Rc::clone(&f);
        source.iter().map_values(move |value| f(value))
    }))
}

pub fn filter<F>(pred: F, seq: &Value) -> error::Result<Value>
where
    F: Fn(&Value) -> error::Result<bool> + 'static,
{
    filtered(pred, seq, true)
}

pub fn filter_not<F>(pred: F, seq: &Value) -> error::Result<Value>
where
    F: Fn(&Value) -> error::Result<bool> + 'static,
{
    filtered(pred, seq, false)
}

fn filtered<F>(pred: F, seq: &Value, keep: bool) -> error::Result<Value>
where
    F: Fn(&Value) -> error::Result<bool> + 'static,
{
    let source = validate::traversable(seq, 2)?;
    let pred = Rc::new(pred);
    Ok(lazy(move || {
        let pred = Rc::clone(&pred);
        Filter::new(source.iter(), move |value: &Value| pred(value), keep)
    }))
}

/// Take up to `n` items, sampling every `step`-th one from the front.
///
/// The sequence must be countable: lists, maps, and lazy sequences whose
/// length is known without pulling them.
pub fn take(seq: &Value, n: i64, step: i64) -> error::Result<Value> {
    let (source, _) = validate::countable(seq, 1)?;
    let n = validate::non_negative(n, 2)?;
    let step = validate::positive(step, 3)?;
    Ok(lazy(move || match source.iter().take_step(n, step) {
        Ok(taken) => Box::new(taken) as PairIter,
        // the sequence no longer reports its length
        Err(e) => failed(e),
    }))
}

pub fn take_while<F>(pred: F, seq: &Value) -> error::Result<Value>
where
    F: Fn(&Value) -> error::Result<bool> + 'static,
{
    let source = validate::traversable(seq, 2)?;
    let pred = Rc::new(pred);
    Ok(lazy(move || {
        let pred = Rc::clone(&pred);
        source.iter().take_while_values(move |value| pred(value))
    }))
}

pub fn drop(seq: &Value, n: i64) -> error::Result<Value> {
    let source = validate::traversable(seq, 1)?;
    let n = validate::non_negative(n, 2)?;
    Ok(lazy(move || renumbered(source.iter().drop_items(n))))
}

pub fn drop_while<F>(pred: F, seq: &Value) -> error::Result<Value>
where
    F: Fn(&Value) -> error::Result<bool> + 'static,
{
    let source = validate::traversable(seq, 2)?;
    let pred = Rc::new(pred);
    Ok(lazy(move || {
        let pred = Rc::clone(&pred);
        source.iter().drop_while_values(move |value| pred(value))
    }))
}

/// Step through the sequences together, yielding a list per step.
pub fn zip(seqs: &[Value]) -> error::Result<Value> {
    let sources = validate::sources(seqs, 1)?;
    Ok(lazy(move || {
        let cursors = sources.iter().map(Traversable::iter).collect();
        match Zip::new(cursors) {
            Ok(zip) => Box::new(renumbered(
                zip.map(|step| step.map(|(index, values)| (index, Value::from(values)))),
            )) as PairIter,
            Err(e) => failed(e),
        }
    }))
}

/// Step through the sequences together, combining each step with `f`.
///
/// `f` receives one value per sequence, in argument order.
pub fn zip_with<F>(f: F, seqs: &[Value]) -> error::Result<Value>
where
    F: Fn(Vec<Value>) -> error::Result<Value> + 'static,
{
    let sources = validate::sources(seqs, 2)?;
    let f = Rc::new(f);
    Ok(lazy(move || {
        let f = Rc::clone(&f);
        let cursors = sources.iter().map(Traversable::iter).collect::<Vec<_>>();
        match crate::zip::zip_with(move |values| f(values), cursors) {
            Ok(zipped) => Box::new(renumbered(zipped)) as PairIter,
            Err(e) => failed(e),
        }
    }))
}

/// Map each value to a traversable and yield its values.
///
/// A callable result that is not traversable is an
/// [`Error::InvalidReturn`] at the pull that produced it.
pub fn flat_map<F>(f: F, seq: &Value) -> error::Result<Value>
where
    F: Fn(Value) -> error::Result<Value> + 'static,
{
    let source = validate::traversable(seq, 2)?;
    let f = Rc::new(f);
    Ok(lazy(move || {
        let f = Rc::clone(&f);
        let expand = move |value| -> error::Result<Values> {
            let inner = f(value)?;
            match Traversable::new(&inner) {
                Some(inner) => Ok(inner.values()),
                None => Err(Error::InvalidReturn {
                    expected: Expected::Traversable,
                    found: inner.kind(),
                }),
            }
        };
        renumbered(source.iter().flat_map_values(expand))
    }))
}

/// Expand nested traversables into one sequence.
pub fn flatten(seq: &Value, depth: impl Into<Depth>) -> error::Result<Value> {
    let source = validate::traversable(seq, 1)?;
    let depth = depth.into();
    Ok(lazy(move || renumbered(source.iter().flatten_values(depth))))
}

/// Split a sequence in two by a predicate.
///
/// Both results remember the predicate outcome per key, shared between
/// them, so the predicate runs at most once per key across all traversals
/// of either result.
pub fn partition<F>(pred: F, seq: &Value) -> error::Result<(Value, Value)>
where
    F: Fn(&Value) -> error::Result<bool> + 'static,
{
    let source = validate::traversable(seq, 2)?;
    let checked = Rc::new(Checked::new(pred));
    let producer = |side: bool| {
        let source = source.clone();
        let checked = Rc::clone(&checked);
        lazy(move || Partition::new(source.iter(), side, Rc::clone(&checked)))
    };
    Ok((producer(true), producer(false)))
}

/// Drain a traversable into its values.
pub fn collect_values(value: &Value) -> error::Result<Vec<Value>> {
    validate::traversable(value, 1)?.values().collect()
}

/// Drain a traversable into its key/value pairs.
pub fn collect_pairs(value: &Value) -> error::Result<Vec<(Key, Value)>> {
    validate::traversable(value, 1)?.iter().collect()
}
