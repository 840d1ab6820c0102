//! Example: Detect chords in one or more audio files
//!
//! Usage:
//!   cargo run --release --example detect_chords -- [--jobs N] [--json] [--min-confidence X] <file1> <file2> ...
//!
//! Notes:
//! - Files are decoded with Symphonia and averaged to mono here; the engine itself never touches files.
//! - Parallelism is across files. Each file analysis is still single-threaded.

use chordtrack::preprocessing::channel_mixer::downmix_interleaved;
use chordtrack::{detect_chords_batch, ChordConfig};
use std::env;
use std::fs::File;
use std::time::Instant;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::get_probe;

fn decode_audio_file(path: &str) -> Result<(Vec<f32>, u32), Box<dyn std::error::Error>> {
    let src = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = std::path::Path::new(path).extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or("No supported audio tracks found")?;

    let track_id = track.id;
    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .unwrap_or(ChordConfig::DEFAULT_SAMPLE_RATE);
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);
    let mut interleaved: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(Box::new(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                channels = spec.channels.count();
                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                interleaved.extend_from_slice(buf.samples());
            }
            Err(symphonia::core::errors::Error::DecodeError(_)) => {
                // Skip decode errors (can happen with corrupted packets).
                continue;
            }
            Err(e) => return Err(Box::new(e)),
        }
    }

    let samples = downmix_interleaved(&interleaved, channels)?;
    Ok((samples, sample_rate))
}

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut config = ChordConfig::default();
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--min-confidence" => {
                config.min_confidence = args
                    .first()
                    .ok_or("--min-confidence requires a value")?
                    .parse::<f32>()?;
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: detect_chords [--jobs N] [--json] [--min-confidence X] <file1> <file2> ...\n\
                     \n\
                     --jobs N             Parallel workers (default: CPU-1)\n\
                     --json               Emit one JSON object per line (JSONL)\n\
                     --min-confidence X   Confidence floor (default: 0.3)\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one audio file path. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let t0 = Instant::now();

    let mut decoded = Vec::with_capacity(paths.len());
    let mut decoded_paths = Vec::with_capacity(paths.len());
    for path in &paths {
        match decode_audio_file(path) {
            Ok(signal) => {
                decoded.push(signal);
                decoded_paths.push(path.clone());
            }
            Err(e) => {
                if json {
                    println!(
                        "{{\"file\":{},\"success\":false,\"error\":{}}}",
                        serde_json::to_string(path)?,
                        serde_json::to_string(&format!("decode failed: {e}"))?
                    );
                } else {
                    println!("{}: ERROR: decode failed: {}", path, e);
                }
            }
        }
    }

    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    let responses = pool.install(|| detect_chords_batch(&decoded, &config));

    for (path, response) in decoded_paths.iter().zip(responses.iter()) {
        if json {
            println!(
                "{{\"file\":{},\"result\":{}}}",
                serde_json::to_string(path)?,
                response.to_json()?
            );
        } else if response.success {
            println!(
                "{}: {} chords over {:.2}s",
                path,
                response.chords.len(),
                response.duration
            );
            for c in &response.chords {
                println!(
                    "  {:>8.3}s  {:<4} conf={:.3} dur={:.3}s",
                    c.time, c.chord, c.confidence, c.duration
                );
            }
        } else {
            println!(
                "{}: ERROR: {}",
                path,
                response.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    eprintln!("Done: {} files in {:.0}ms", paths.len(), t0.elapsed().as_secs_f64() * 1000.0);

    Ok(())
}
