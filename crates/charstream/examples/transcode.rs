//! Convert a file in any supported charset to UTF-8 on stdout.
//!
//! ```sh
//! cargo run --example transcode -- windows-1252 page.html
//! ```

use std::io::{Read, Write};
use std::{env, fs, io, process};

use charstream::{InputStream, Peeked, Session};

fn main() {
    let mut args = env::args().skip(1);
    let (Some(encoding), Some(path)) = (args.next(), args.next()) else {
        eprintln!("usage: transcode <encoding> <file>");
        process::exit(2);
    };

    let session = Session::with_default_aliases();
    let mut stream = match InputStream::new(&session, Some(&encoding), 1, None) {
        Ok(stream) => stream,
        Err(err) => {
            eprintln!("transcode: {encoding}: {err}");
            process::exit(1);
        }
    };

    let mut file = match fs::File::open(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("transcode: {path}: {err}");
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut chunk = [0u8; 4096];

    loop {
        let n = match file.read(&mut chunk) {
            Ok(0) => {
                stream.close();
                drain(&mut stream, &mut out);
                break;
            }
            Ok(n) => n,
            Err(err) => {
                eprintln!("transcode: {path}: {err}");
                process::exit(1);
            }
        };

        stream.append(&chunk[..n]);
        drain(&mut stream, &mut out);
    }

    let (charset, source) = stream.read_charset();
    eprintln!("transcode: converted from {charset} (source {source})");
}

fn drain(stream: &mut InputStream<'_>, out: &mut impl Write) {
    loop {
        match stream.peek(0) {
            Peeked::Bytes(bytes) => {
                let len = bytes.len();
                if out.write_all(bytes).is_err() {
                    process::exit(1);
                }
                stream.advance(len);
            }
            Peeked::Eof | Peeked::OutOfData => return,
        }
    }
}
