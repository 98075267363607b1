use super::{Cursor, RangeRule, Result};
use core::{
    fmt,
    mem::{self, MaybeUninit},
    ptr,
};

const CAPACITY: usize = 4 * mem::size_of::<usize>();

#[repr(C)]
struct Storage {
    _align: [usize; 0],
    bytes: [MaybeUninit<u8>; CAPACITY],
}

impl Storage {
    const fn uninit() -> Self {
        Self {
            _align: [],
            bytes: [MaybeUninit::uninit(); CAPACITY],
        }
    }

    fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr().cast()
    }

    fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr().cast()
    }
}

struct VTable<'a, V> {
    begin: unsafe fn(*const u8, &mut Cursor<'a>) -> Result<V>,
    increment: unsafe fn(*const u8, &mut Cursor<'a>) -> Result<V>,
    clone: unsafe fn(*const u8, *mut u8),
    drop: unsafe fn(*mut u8),
}

impl<V> Clone for VTable<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for VTable<'_, V> {}

/// A type-erased [`RangeRule`] stored inline, without heap allocation.
///
/// Rules larger than four machine words, or more strictly aligned than
/// a machine word, are rejected at compile time.
pub struct AnyRule<'a, V> {
    storage: Storage,
    vtable: VTable<'a, V>,
}

impl<'a, V> AnyRule<'a, V> {
    /// Erases the type of a rule.
    pub fn new<R: RangeRule<'a, Value = V>>(rule: R) -> Self {
        const {
            assert!(
                mem::size_of::<R>() <= CAPACITY && mem::align_of::<R>() <= mem::align_of::<usize>(),
                "element rule too large for inline storage"
            );
        }

        let mut storage = Storage::uninit();
        // SAFETY: `storage` is large and aligned enough for `R`, as checked above.
        unsafe { ptr::write(storage.as_mut_ptr().cast::<R>(), rule) };

        Self {
            storage,
            vtable: VTable {
                begin: begin::<R>,
                increment: increment::<R>,
                clone: clone::<R>,
                drop: drop::<R>,
            },
        }
    }

    /// Calls [`RangeRule::begin`] on the stored rule.
    pub fn begin(&self, cur: &mut Cursor<'a>) -> Result<V> {
        // SAFETY: The storage holds a valid rule of the type the vtable was built for.
        unsafe { (self.vtable.begin)(self.storage.as_ptr(), cur) }
    }

    /// Calls [`RangeRule::increment`] on the stored rule.
    pub fn increment(&self, cur: &mut Cursor<'a>) -> Result<V> {
        // SAFETY: Same as above.
        unsafe { (self.vtable.increment)(self.storage.as_ptr(), cur) }
    }
}

impl<V> Clone for AnyRule<'_, V> {
    fn clone(&self) -> Self {
        let mut storage = Storage::uninit();
        // SAFETY: The source holds a valid rule and the destination has
        // the same size and alignment.
        unsafe { (self.vtable.clone)(self.storage.as_ptr(), storage.as_mut_ptr()) };
        Self {
            storage,
            vtable: self.vtable,
        }
    }
}

impl<V> Drop for AnyRule<'_, V> {
    fn drop(&mut self) {
        // SAFETY: The storage holds a valid rule that is never used again.
        unsafe { (self.vtable.drop)(self.storage.as_mut_ptr()) }
    }
}

impl<V> fmt::Debug for AnyRule<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyRule").finish_non_exhaustive()
    }
}

unsafe fn begin<'a, R: RangeRule<'a>>(p: *const u8, cur: &mut Cursor<'a>) -> Result<R::Value> {
    // SAFETY: The caller guarantees that `p` points to a valid `R`.
    unsafe { (*p.cast::<R>()).begin(cur) }
}

unsafe fn increment<'a, R: RangeRule<'a>>(p: *const u8, cur: &mut Cursor<'a>) -> Result<R::Value> {
    // SAFETY: The caller guarantees that `p` points to a valid `R`.
    unsafe { (*p.cast::<R>()).increment(cur) }
}

unsafe fn clone<'a, R: RangeRule<'a>>(src: *const u8, dst: *mut u8) {
    // SAFETY: The caller guarantees that `src` points to a valid `R`
    // and that `dst` is valid for writes of `R`.
    unsafe { ptr::write(dst.cast::<R>(), (*src.cast::<R>()).clone()) }
}

unsafe fn drop<'a, R: RangeRule<'a>>(p: *mut u8) {
    // SAFETY: The caller guarantees that `p` points to a valid `R`
    // that is not used afterwards.
    unsafe { ptr::drop_in_place(p.cast::<R>()) }
}
