/*!
Encode 1-bit bitmaps as COE files, the text format FPGA tools use to
initialize block RAM.

```
# use coe_core::{bitmap::BitMatrix, container::coe};
let matrix = BitMatrix::from_fn(2, 2, |x, y| x == y);
let mut out: Vec<u8> = Vec::new();
coe::write(&mut out, &matrix).unwrap();
assert_eq!(
    out,
    b"memory_initialization_radix=2;\nmemory_initialization_vector=\n10,\n01\n;"
);
```
*/

#![no_std]

pub mod bitmap;
pub mod container;
pub mod dither;
pub mod fs;

extern crate alloc;
