use fnv::FnvHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Decoded images for one mount, keyed by URL. Only pixels are shared;
/// every plane still uploads and owns its own texture.
pub struct DecodeCache<T> {
    entries: RefCell<FnvHashMap<String, Rc<T>>>,
}

impl<T> Default for DecodeCache<T> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(FnvHashMap::default()),
        }
    }
}

impl<T> DecodeCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<Rc<T>> {
        self.entries.borrow().get(url).cloned()
    }

    /// Store a freshly decoded image. If another load of the same URL won
    /// the race, its entry is kept and returned instead.
    pub fn insert(&self, url: &str, value: T) -> Rc<T> {
        self.entries
            .borrow_mut()
            .entry(url.to_string())
            .or_insert_with(|| Rc::new(value))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}
