//! Lazy transformations over sequences of key/value pairs.
//!
//! A sequence is any iterator of `Result<(K, V), E>`. The operations here
//! wrap a sequence in an adapter that does no work until it is pulled:
//! [`map`], [`filter`], [`filter_not`], [`take`], [`take_while`], [`drop`],
//! [`drop_while`], [`zip`], [`zip_with`], [`flat_map`], [`flatten`] and
//! [`partition`]. The same operations are available as methods through
//! [`PairsExt`].
//!
//! The [`ops`] module offers them over dynamic [`Value`]s, with argument
//! checks performed up front and restartable lazy results.

pub mod error;
mod flatten;
mod key;
pub mod ops;
mod pairs;
mod partition;
mod stream;
mod transform;
pub mod validate;
mod value;
mod zip;

pub use error::{Error, Expected, Kind, Result};
pub use flatten::{flat_map, flatten, Depth, FlatMap, Flatten, Nested};
pub use key::Key;
pub use pairs::{keyed, positional, Keyed, PairsExt, Positional};
pub use partition::{partition, Partition};
pub use stream::{PairIter, Stream};
pub use transform::{
    drop, drop_while, filter, filter_not, map, take, take_while, DropFirst, DropWhile, Filter,
    MapValues, TakeStep, TakeWhile,
};
pub use value::{Traversable, Value, Values};
pub use zip::{zip, zip_with, Zip, ZipWith};
