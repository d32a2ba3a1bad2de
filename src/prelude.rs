pub use crate::dprintln; // Make the macro available
pub use anyhow::Result as R;
pub use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
pub use log::{error, warn};

pub use std::io::{Cursor, Read, Seek, SeekFrom, Write};
