use clap::{arg, crate_version, Command};

use codecbench::csv_report::{entropy_bits_per_byte, write_rows, BenchRow};
use codecbench::lz77::Lz77Codec;
use codecbench::lzw::LzwCodec;
use codecbench::shannon_fano::{ShannonFanoCodec, ShannonFanoTree};
use codecbench::stopwatch::Stopwatch;
use codecbench::{framing, io};

const RCH: &str = "unreachable was reached";
const METHODS: [&str; 3] = ["shannon-fano", "lz77", "lzw"];
const DEFAULT_DICT_SIZE: usize = 4 * 1024;
const DEFAULT_WINDOW_SIZE: usize = 5 * 1024;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let long_help = "Examples:
---------
Encode:     `codecbench encode -m lzw -i plain.bin -o plain.lzw`
Decode:     `codecbench decode -m lzw -i plain.lzw -o plain.bin`
Benchmark:  `codecbench bench -i corpus/ -o report.csv`";

    let mut main_cmd = Command::new("codecbench")
        .about("Benchmark Shannon-Fano, LZ77, and LZW byte-stream compression")
        .after_long_help(long_help)
        .version(crate_version!());

    main_cmd = main_cmd.subcommand(
        Command::new("encode")
            .about("encode a file with one codec")
            .arg(arg!(-m --method <METHOD> "compression algorithm").value_parser(METHODS).required(true))
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .arg(arg!(--"dict-size" <N> "LZ77 dictionary size in bytes").value_parser(clap::value_parser!(usize)))
            .arg(arg!(--"window-size" <N> "LZ77 window size in bytes").value_parser(clap::value_parser!(usize))),
    );

    main_cmd = main_cmd.subcommand(
        Command::new("decode")
            .about("decode a file with one codec")
            .arg(arg!(-m --method <METHOD> "compression algorithm").value_parser(METHODS).required(true))
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .arg(arg!(--"dict-size" <N> "LZ77 dictionary size in bytes").value_parser(clap::value_parser!(usize)))
            .arg(arg!(--"window-size" <N> "LZ77 window size in bytes").value_parser(clap::value_parser!(usize))),
    );

    main_cmd = main_cmd.subcommand(
        Command::new("bench")
            .about("run all three codecs against every file in a directory and write a CSV report")
            .arg(arg!(-i --input <DIR> "corpus directory").required(true))
            .arg(arg!(-o --output <PATH> "CSV report path").required(true)),
    );

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("encode") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let method = cmd.get_one::<String>("method").expect(RCH);
        let dict_size = cmd.get_one::<usize>("dict-size").copied().unwrap_or(DEFAULT_DICT_SIZE);
        let window_size = cmd.get_one::<usize>("window-size").copied().unwrap_or(DEFAULT_WINDOW_SIZE);
        let data = io::read_file(path_in)?;
        let encoded = encode(method, &data, dict_size, window_size)?;
        io::write_file(path_out, &encoded)?;
    }

    if let Some(cmd) = matches.subcommand_matches("decode") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let method = cmd.get_one::<String>("method").expect(RCH);
        let dict_size = cmd.get_one::<usize>("dict-size").copied().unwrap_or(DEFAULT_DICT_SIZE);
        let window_size = cmd.get_one::<usize>("window-size").copied().unwrap_or(DEFAULT_WINDOW_SIZE);
        let data = io::read_file(path_in)?;
        let decoded = decode(method, &data, dict_size, window_size)?;
        io::write_file(path_out, &decoded)?;
    }

    if let Some(cmd) = matches.subcommand_matches("bench") {
        let dir = cmd.get_one::<String>("input").expect(RCH);
        let report_path = cmd.get_one::<String>("output").expect(RCH);
        run_bench(dir, report_path)?;
    }

    Ok(())
}

fn encode(
    method: &str,
    data: &[u8],
    dict_size: usize,
    window_size: usize,
) -> Result<Vec<u8>, codecbench::Error> {
    match method {
        "shannon-fano" => {
            let codec = ShannonFanoCodec::from_bytes(data)?;
            let (code, payload) = codec.encode_bytes(data)?;
            Ok(framing::pack_shannon_fano(&code, &payload)?)
        }
        "lz77" => {
            let codec = Lz77Codec::new(dict_size, window_size)?;
            let triples = codec.encode(data);
            Ok(framing::pack_lz77(dict_size, window_size, &triples)?)
        }
        "lzw" => {
            let result = LzwCodec::encode(data);
            Ok(framing::pack_lzw(&result)?)
        }
        _ => unreachable!("{RCH}: {method}"),
    }
}

fn decode(
    method: &str,
    data: &[u8],
    dict_size: usize,
    window_size: usize,
) -> Result<Vec<u8>, codecbench::Error> {
    match method {
        "shannon-fano" => {
            let (code, payload) = framing::unpack_shannon_fano(data)?;
            let tree = ShannonFanoTree::from_code(&code);
            Ok(tree.decode_bits(&payload)?)
        }
        "lz77" => {
            let triples = framing::unpack_lz77(dict_size, window_size, data)?;
            Ok(Lz77Codec::decode(&triples)?)
        }
        "lzw" => {
            let result = framing::unpack_lzw(data)?;
            Ok(LzwCodec::decode(&result)?)
        }
        _ => unreachable!("{RCH}: {method}"),
    }
}

/// Run every codec against every regular file directly inside `dir` and
/// write one CSV row per (file, codec) pair. A file that fails a single
/// codec is logged and skipped for that row; the run continues.
fn run_bench(dir: &str, report_path: &str) -> Result<(), codecbench::Error> {
    let mut rows = Vec::new();
    let entries = std::fs::read_dir(dir)?;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let file_name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        let data = match io::read_file(&path) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("skipping {file_name}: {e}");
                continue;
            }
        };
        if data.is_empty() {
            log::warn!("skipping {file_name}: empty file");
            continue;
        }
        let original_bytes = match io::file_size(&path) {
            Ok(size) => size,
            Err(e) => {
                log::warn!("skipping {file_name}: could not stat file: {e}");
                continue;
            }
        };
        let entropy = entropy_bits_per_byte(&data);

        for (codec, params) in [
            ("shannon-fano", String::new()),
            ("lz77", format!("D={DEFAULT_DICT_SIZE},W={DEFAULT_WINDOW_SIZE}")),
            ("lzw", String::new()),
        ] {
            let mut encode_watch = Stopwatch::new();
            let encoded = match encode_watch
                .time(|| encode(codec, &data, DEFAULT_DICT_SIZE, DEFAULT_WINDOW_SIZE))
            {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("{file_name}/{codec}: encode failed: {e}");
                    continue;
                }
            };

            let mut decode_watch = Stopwatch::new();
            match decode_watch.time(|| decode(codec, &encoded, DEFAULT_DICT_SIZE, DEFAULT_WINDOW_SIZE)) {
                Ok(restored) if restored == data => {}
                Ok(_) => {
                    log::warn!("{file_name}/{codec}: round trip mismatch");
                    continue;
                }
                Err(e) => {
                    log::warn!("{file_name}/{codec}: decode failed: {e}");
                    continue;
                }
            }

            rows.push(BenchRow {
                file: file_name.clone(),
                codec: codec.to_string(),
                params,
                original_bytes,
                entropy_bits_per_byte: entropy,
                encoded_bytes: encoded.len() as u64,
                ratio: encoded.len() as f64 / data.len() as f64,
                encode_seconds: encode_watch.elapsed_seconds(),
                decode_seconds: decode_watch.elapsed_seconds(),
            });
        }
    }

    write_rows(report_path, &rows)?;
    Ok(())
}
