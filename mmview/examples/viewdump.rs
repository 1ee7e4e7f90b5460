// Copyright 2026 The mmview Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Dumps a single integer from a file at a given offset. Not part of
//! mmview's public contract; a small hand-exercise harness in the spirit of
//! crosvm's own `mkfs` example binary.

use argh::FromArgs;
use mmview::{CreateMode, Viewer, ViewerConfig};

#[derive(FromArgs)]
/// Read one integer out of a file through mmview.
struct Args {
    /// path to the file to read
    #[argh(positional)]
    path: String,

    /// byte offset to read at
    #[argh(positional)]
    offset: u64,

    /// width in bytes: 1, 2, 4, or 8
    #[argh(option, default = "8")]
    width: u32,

    /// interpret the integer as signed
    #[argh(switch)]
    signed: bool,

    /// read in big-endian order (default little-endian)
    #[argh(switch)]
    big_endian: bool,
}

fn main() {
    env_logger::init();
    let args: Args = argh::from_env();
    let le = !args.big_endian;

    let mut viewer = Viewer::create(&args.path, CreateMode::ReadOnly, ViewerConfig::default())
        .unwrap_or_else(|e| {
            eprintln!("failed to open {}: {e}", args.path);
            std::process::exit(1);
        });

    let value = match (args.width, args.signed) {
        (1, false) => mmview::read8u(&mut viewer, args.offset) as i128,
        (1, true) => mmview::read8s(&mut viewer, args.offset) as i128,
        (2, false) => mmview::read16u(&mut viewer, args.offset, le) as i128,
        (2, true) => mmview::read16s(&mut viewer, args.offset, le) as i128,
        (4, false) => mmview::read32u(&mut viewer, args.offset, le) as i128,
        (4, true) => mmview::read32s(&mut viewer, args.offset, le) as i128,
        (8, false) => mmview::read64u(&mut viewer, args.offset, le) as i128,
        (8, true) => mmview::read64s(&mut viewer, args.offset, le) as i128,
        (other, _) => {
            eprintln!("unsupported width {other}, expected 1, 2, 4, or 8");
            std::process::exit(1);
        }
    };

    println!("{value}");
}
