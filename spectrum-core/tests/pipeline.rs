use rustfft::FftPlanner;
use rustfft::num_complex::Complex32;
use spectrum_core::analyzer::SAMPLE_RATE;
use spectrum_core::peak::{bin_frequency, bin_width, dominant_bin, refine};
use spectrum_core::{
    Analyzer, ExtractOptions, Normalization, OutputMode, SpectrumBin, WindowKind, configure,
};
use std::num::NonZeroU32;

const N: usize = 512;
const UNITY: NonZeroU32 = NonZeroU32::MIN;

fn sine(frequency: f64, amplitude: f64, len: usize) -> Vec<i16> {
    (0..len)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE as f64;
            (amplitude * (2.0 * std::f64::consts::PI * frequency * t).sin()).round() as i16
        })
        .collect()
}

fn magnitudes(bins: &[SpectrumBin]) -> Vec<f32> {
    bins.iter().map(|b| b.magnitude).collect()
}

fn options(mode: OutputMode, normalization: Normalization) -> ExtractOptions {
    ExtractOptions {
        mode,
        normalization,
        ..ExtractOptions::default()
    }
}

#[test]
fn on_bin_sine_lands_in_a_single_bin() {
    let tables = configure(N, WindowKind::Rectangular).unwrap();
    let mut analyzer = Analyzer::new(&tables, ExtractOptions::default());

    // bin 10 is exactly 937.5 Hz at 48 kHz / 512
    let bins = analyzer.analyze_frame(&sine(937.5, 10_000.0, N), UNITY);

    let peak = dominant_bin(bins, &ExtractOptions::default(), true).unwrap();
    assert_eq!(peak.bin, 10);
    let magnitude = bins[10].magnitude;
    assert!((magnitude - 5_000.0).abs() < 5.0, "peak was {magnitude}");
    for (k, bin) in bins.iter().enumerate().filter(|(k, _)| *k != 10) {
        assert!(bin.magnitude < 1.0, "bin {k} leaked {}", bin.magnitude);
        assert!(magnitude >= 10.0 * bin.magnitude);
    }
}

#[test]
fn thousand_hertz_tone_peaks_at_bin_eleven() {
    let tables = configure(N, WindowKind::Rectangular).unwrap();
    let opts = options(OutputMode::Full, Normalization::Raw);
    let mut analyzer = Analyzer::new(&tables, opts);
    let bins = analyzer.analyze_frame(&sine(1_000.0, 10_000.0, N), UNITY);

    let peak = dominant_bin(bins, &opts, true).unwrap();
    assert_eq!(peak.bin, 11);
    assert!(bins[11].magnitude > 1.5 * bins[10].magnitude);
    assert!(bins[11].magnitude > 3.0 * bins[12].magnitude);
    assert_eq!(bin_frequency(peak.bin, SAMPLE_RATE, N), 1_031.25);

    let refined = refine(bins, &opts, peak) * bin_width(SAMPLE_RATE, N);
    assert!((refined - 1_000.0).abs() < bin_width(SAMPLE_RATE, N), "refined to {refined} Hz");
}

#[test]
fn decibel_output_keeps_the_peak_readout() {
    let tables = configure(N, WindowKind::Rectangular).unwrap();
    let opts = options(OutputMode::Decibels, Normalization::Raw);
    let mut analyzer = Analyzer::new(&tables, opts);
    let bins = analyzer.analyze_frame(&sine(937.5, 10_000.0, N), UNITY);

    assert!(bins.iter().all(|b| b.magnitude == 0.0));
    let peak = dominant_bin(bins, &opts, true).unwrap();
    assert_eq!(peak.bin, 10);
    assert_eq!(peak.level_db, bins[10].decibels);
    assert!((refine(bins, &opts, peak) - 10.0).abs() < 0.5);

    let silent = analyzer.analyze_frame(&[0; N], UNITY);
    assert_eq!(dominant_bin(silent, &opts, true), None);
}

#[test]
fn zero_magnitude_floor_still_gives_finite_decibels() {
    let tables = configure(64, WindowKind::Rectangular).unwrap();
    let opts = ExtractOptions {
        mode: OutputMode::Full,
        normalization: Normalization::Raw,
        magnitude_floor: 0.0,
    };
    let mut analyzer = Analyzer::new(&tables, opts);
    let bins = analyzer.analyze_frame(&[0; 64], UNITY);
    assert!(opts.decibel_floor().is_finite());
    assert!(bins.iter().all(|b| b.decibels == opts.decibel_floor()));
}

#[test]
fn magnitudes_scale_linearly_with_input() {
    let tables = configure(N, WindowKind::Hann).unwrap();
    let opts = options(OutputMode::MagnitudePhase, Normalization::Raw);
    let samples = sine(2_300.0, 8_000.0, N);

    let mut analyzer = Analyzer::new(&tables, opts);
    let base = magnitudes(analyzer.analyze_frame(&samples, UNITY));
    let tripled = magnitudes(analyzer.analyze_frame(&samples, NonZeroU32::new(3).unwrap()));

    let negated: Vec<i16> = samples.iter().map(|&s| s * -2).collect();
    let doubled = magnitudes(analyzer.analyze_frame(&negated, UNITY));

    let peak = base.iter().copied().fold(0.0, f32::max);
    let tolerance = peak * 1e-5 + 1e-2;
    for k in 0..base.len() {
        assert!((tripled[k] - 3.0 * base[k]).abs() <= 3.0 * tolerance, "bin {k}");
        assert!((doubled[k] - 2.0 * base[k]).abs() <= 2.0 * tolerance, "bin {k}");
    }
}

#[test]
fn silence_produces_the_decibel_floor() {
    let tables = configure(N, WindowKind::BlackmanHarris).unwrap();
    let opts = options(OutputMode::Full, Normalization::PerLength);
    let mut analyzer = Analyzer::new(&tables, opts);

    let bins = analyzer.analyze_frame(&[0; N], UNITY);
    assert_eq!(bins.len(), N / 2);
    for bin in bins {
        assert_eq!(bin.magnitude, 0.0);
        assert_eq!(bin.decibels, opts.decibel_floor());
        assert!(bin.phase.is_finite());
    }
}

#[test]
fn clipped_input_stays_finite() {
    let tables = configure(N, WindowKind::Rectangular).unwrap();
    let mut analyzer = Analyzer::new(&tables, options(OutputMode::Full, Normalization::Raw));
    let samples: Vec<i16> = (0..N).map(|i| if i % 2 == 0 { i16::MAX } else { i16::MIN }).collect();

    let bins = analyzer.analyze_frame(&samples, NonZeroU32::new(255).unwrap());
    assert!(
        bins.iter()
            .all(|b| b.magnitude.is_finite() && b.phase.is_finite() && b.decibels.is_finite())
    );
}

#[test]
fn capture_grain_is_truncated_and_short_grains_padded() {
    let tables = configure(N, WindowKind::Hamming).unwrap();
    let mut analyzer = Analyzer::new(&tables, ExtractOptions::default());

    let grain = sine(3_000.0, 12_000.0, 768);
    let full = magnitudes(analyzer.analyze_frame(&grain, UNITY));
    let exact = magnitudes(analyzer.analyze_frame(&grain[..N], UNITY));
    assert_eq!(full, exact);

    let mut padded = grain[..300].to_vec();
    padded.resize(N, 0);
    let short = magnitudes(analyzer.analyze_frame(&grain[..300], UNITY));
    let explicit = magnitudes(analyzer.analyze_frame(&padded, UNITY));
    assert_eq!(short, explicit);
}

#[test]
fn windowed_pipeline_agrees_with_rustfft() {
    let tables = configure(N, WindowKind::Blackman).unwrap();
    let opts = options(OutputMode::MagnitudePhase, Normalization::Raw);
    let mut analyzer = Analyzer::new(&tables, opts);
    let samples = sine(4_321.0, 9_000.0, N);
    let gain = NonZeroU32::new(2).unwrap();
    let ours = magnitudes(analyzer.analyze_frame(&samples, gain));

    let mut reference: Vec<Complex32> = samples
        .iter()
        .zip(tables.window())
        .map(|(&s, &w)| Complex32::new(f32::from(s) * 2.0 * w, 0.0))
        .collect();
    FftPlanner::new().plan_fft_forward(N).process(&mut reference);

    let peak = ours.iter().copied().fold(0.0, f32::max);
    for k in 0..N / 2 {
        assert!((ours[k] - reference[k].norm()).abs() <= peak * 1e-5 + 1e-2, "bin {k}");
    }
}

#[test]
fn tapered_window_reduces_far_leakage() {
    let samples = sine(1_000.0, 10_000.0, N);
    let far_leakage = |kind: WindowKind| {
        let tables = configure(N, kind).unwrap();
        let mut analyzer = Analyzer::new(&tables, ExtractOptions::default());
        let bins = analyzer.analyze_frame(&samples, UNITY);
        let peak = dominant_bin(bins, &ExtractOptions::default(), true).unwrap();
        bins[40].magnitude / bins[peak.bin].magnitude
    };
    assert!(far_leakage(WindowKind::Hann) * 10.0 < far_leakage(WindowKind::Rectangular));
}

#[test]
fn tables_can_be_shared_across_threads() {
    let tables = configure(N, WindowKind::Hann).unwrap();
    let samples = sine(5_000.0, 7_000.0, N);

    let results: Vec<Vec<f32>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                scope.spawn(|| {
                    let mut analyzer = Analyzer::new(&tables, ExtractOptions::default());
                    magnitudes(analyzer.analyze_frame(&samples, UNITY))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(results[0], results[1]);
}
