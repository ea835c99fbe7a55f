use crate::error;
use crate::validate;

/// Step through several sequences at once.
///
/// Each step yields one value from every source, keyed by position. Stepping
/// stops as soon as any source is exhausted. At least two sources are
/// required.
pub fn zip<S, I, K, V, E>(sources: S) -> error::Result<Zip<I::IntoIter>>
where
    S: IntoIterator<Item = I>,
    I: IntoIterator<Item = Result<(K, V), E>>,
{
    Zip::new(sources.into_iter().map(IntoIterator::into_iter).collect())
}

/// Like [`zip`], but combine the values of each step with `f`.
///
/// The sources are counted from argument 2.
pub fn zip_with<S, I, K, V, U, E, F>(f: F, sources: S) -> error::Result<ZipWith<I::IntoIter, F>>
where
    S: IntoIterator<Item = I>,
    I: IntoIterator<Item = Result<(K, V), E>>,
    F: FnMut(Vec<V>) -> Result<U, E>,
{
    let sources = sources
        .into_iter()
        .map(IntoIterator::into_iter)
        .collect::<Vec<_>>();
    validate::arity(sources.len(), 2)?;
    Ok(ZipWith {
        zip: Zip::unchecked(sources),
        f,
        done: false,
    })
}

pub struct Zip<I> {
    sources: Vec<I>,
    index: usize,
    done: bool,
}

impl<I> Zip<I> {
    pub(crate) fn new(sources: Vec<I>) -> error::Result<Self> {
        validate::arity(sources.len(), 1)?;
        Ok(Self::unchecked(sources))
    }

    fn unchecked(sources: Vec<I>) -> Self {
        Self {
            sources,
            index: 0,
            done: false,
        }
    }
}

impl<I, K, V, E> Iterator for Zip<I>
where
    I: Iterator<Item = Result<(K, V), E>>,
{
    type Item = Result<(usize, Vec<V>), E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut values = Vec::with_capacity(self.sources.len());
        for source in &mut self.sources {
            match source.next() {
                Some(Ok((_, value))) => values.push(value),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    return None;
                }
            }
        }
        let index = self.index;
        self.index += 1;
        Some(Ok((index, values)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        self.sources
            .iter()
            .map(|source| source.size_hint())
            .fold((usize::MAX, None), |(lower, upper), (l, u)| {
                let upper = match (upper, u) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
                (lower.min(l), upper)
            })
    }
}

pub struct ZipWith<I, F> {
    zip: Zip<I>,
    f: F,
    done: bool,
}

impl<I, K, V, U, E, F> Iterator for ZipWith<I, F>
where
    I: Iterator<Item = Result<(K, V), E>>,
    F: FnMut(Vec<V>) -> Result<U, E>,
{
    type Item = Result<(usize, U), E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let (index, values) = match self.zip.next()? {
            Ok(step) => step,
            Err(e) => return Some(Err(e)),
        };
        match (self.f)(values) {
            Ok(value) => Some(Ok((index, value))),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            self.zip.size_hint()
        }
    }
}
