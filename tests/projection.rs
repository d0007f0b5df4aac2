//! Cross <-> equirect resampling on smooth analytic environments.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use zencross::equirect;
use zencross::face::Vec3;
use zencross::{
    CrossLayout, DimensionError, EquirectLayout, Face, PixelBuffer, cross_to_equirect,
    equirect_to_cross,
};

/// Smooth, positive, linear in the direction, different in every channel.
fn env(d: Vec3) -> [f32; 3] {
    let [x, y, z] = d;
    [
        (1.5 + 0.3 * x + 0.5 * y + 0.8 * z) as f32,
        (1.0 - 0.6 * x + 0.2 * z) as f32,
        (0.7 + 0.4 * y - 0.3 * z) as f32,
    ]
}

fn lat_long_direction(lambda: f64, phi: f64) -> Vec3 {
    [phi.cos() * lambda.sin(), phi.sin(), -phi.cos() * lambda.cos()]
}

fn pano_direction(u: u32, v: u32, w: u32, h: u32) -> Vec3 {
    let lambda = f64::from(u) / f64::from(w) * TAU - PI;
    let phi = FRAC_PI_2 - f64::from(v) / f64::from(h) * PI;
    lat_long_direction(lambda, phi)
}

fn env_pano(w: u32, h: u32) -> EquirectLayout {
    EquirectLayout::new(PixelBuffer::from_fn(w, h, |u, v| env(pano_direction(u, v, w, h))).unwrap())
}

/// Cross with every face texel set from `env` at its centre direction.
fn env_cross(n: u32) -> CrossLayout {
    let mut buf = PixelBuffer::new(3 * n, 4 * n).unwrap();
    for face in Face::ALL {
        let (col, row) = face.cell();
        for j in 0..n {
            for i in 0..n {
                let u = (f64::from(i) + 0.5) / f64::from(n);
                let v = (f64::from(j) + 0.5) / f64::from(n);
                buf.set_pixel(col * n + i, row * n + j, env(face.direction(u, v)));
            }
        }
    }
    CrossLayout::new(buf).unwrap()
}

fn max_diff(a: [f32; 3], b: [f32; 3]) -> f32 {
    (0..3).map(|c| (a[c] - b[c]).abs()).fold(0.0, f32::max)
}

#[test]
fn equirect_cross_equirect_round_trip() {
    let (w, h) = (256, 128);
    let pano = env_pano(w, h);
    let cross = equirect_to_cross(&pano, 64).unwrap();
    assert!(cross.warning.is_none());
    let back = cross_to_equirect(&cross.image, w, h).unwrap().image;

    let (a, b) = (pano.buffer().samples(), back.buffer().samples());
    let mae = a.iter().zip(b).map(|(x, y)| f64::from((x - y).abs())).sum::<f64>() / a.len() as f64;
    assert!(mae < 0.01, "mean absolute error {mae}");
}

#[test]
fn cross_faces_match_panorama() {
    let pano = env_pano(512, 256);
    let cross = equirect_to_cross(&pano, 32).unwrap().image;
    for face in Face::ALL {
        let r = cross.face_rect(face);
        for j in 0..32 {
            for i in 0..32 {
                let d = face.direction((f64::from(i) + 0.5) / 32.0, (f64::from(j) + 0.5) / 32.0);
                let got = cross.buffer().pixel(r.x + i, r.y + j);
                assert!(max_diff(got, env(d)) < 0.02, "{face:?} ({i},{j})");
            }
        }
    }
}

#[test]
fn seams_are_continuous() {
    let (w, h) = (512, 256);
    let pano = cross_to_equirect(&env_cross(64), w, h).unwrap().image;
    let buf = pano.buffer();

    for v in 0..h {
        for u in 0..w {
            let d = pano_direction(u, v, w, h);
            assert!(max_diff(buf.pixel(u, v), env(d)) < 0.02, "pixel ({u},{v})");
        }
    }

    // neighbours that read from different faces
    let mut crossings = 0;
    for v in 0..h - 1 {
        for u in 0..w {
            let face = Face::from_direction(pano_direction(u, v, w, h));
            for (nu, nv) in [((u + 1) % w, v), (u, v + 1)] {
                if Face::from_direction(pano_direction(nu, nv, w, h)) != face {
                    crossings += 1;
                    let step = max_diff(buf.pixel(u, v), buf.pixel(nu, nv));
                    assert!(step < 0.04, "({u},{v}) -> ({nu},{nv}) jumps by {step}");
                }
            }
        }
    }
    assert!(crossings > 1000, "only {crossings} face crossings");
}

#[test]
fn output_is_deterministic() {
    let cross = env_cross(16);
    let a = cross_to_equirect(&cross, 128, 64).unwrap();
    let b = cross_to_equirect(&cross, 128, 64).unwrap();
    assert_eq!(a, b);

    let pano = env_pano(128, 64);
    assert_eq!(
        equirect_to_cross(&pano, 16).unwrap(),
        equirect_to_cross(&pano, 16).unwrap()
    );
}

/// `cross_to_equirect` recomputed one pixel at a time through the public
/// sampling API.
fn equirect_reference(cross: &CrossLayout, w: u32, h: u32) -> PixelBuffer {
    PixelBuffer::from_fn(w, h, |u, v| {
        let (lambda, phi) = equirect::pixel_to_lat_long(f64::from(u), f64::from(v), w, h);
        cross.sample(equirect::direction_from_lat_long(lambda, phi))
    })
    .unwrap()
}

/// `equirect_to_cross` recomputed one texel at a time.
fn cross_reference(pano: &EquirectLayout, n: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::new(3 * n, 4 * n).unwrap();
    for face in Face::ALL {
        let (col, row) = face.cell();
        for j in 0..n {
            for i in 0..n {
                let u = (f64::from(i) + 0.5) / f64::from(n);
                let v = (f64::from(j) + 0.5) / f64::from(n);
                buf.set_pixel(col * n + i, row * n + j, pano.sample(face.direction(u, v)));
            }
        }
    }
    buf
}

#[test]
fn row_fill_matches_per_pixel_sampling() {
    let cross = env_cross(8);
    let pano = cross_to_equirect(&cross, 64, 32).unwrap().image;
    assert_eq!(pano.buffer(), &equirect_reference(&cross, 64, 32));

    let src = env_pano(64, 32);
    let out = equirect_to_cross(&src, 8).unwrap().image;
    assert_eq!(out.buffer(), &cross_reference(&src, 8));
}

/// Enough rows that the work is split across the thread pool.
#[cfg(feature = "rayon")]
#[test]
fn parallel_rows_are_bit_identical() {
    let cross = env_cross(48);
    for (w, h) in [(384, 192), (301, 157)] {
        let pano = cross_to_equirect(&cross, w, h).unwrap().image;
        assert_eq!(pano.buffer(), &equirect_reference(&cross, w, h), "{w}x{h}");
    }

    let src = env_pano(384, 192);
    for n in [48, 37] {
        let out = equirect_to_cross(&src, n).unwrap().image;
        assert_eq!(out.buffer(), &cross_reference(&src, n), "face size {n}");
    }
}

#[test]
fn ties_pick_x_then_y() {
    for d in [[1.0, 1.0, 1.0], [1.0, -1.0, 0.0], [0.5, 0.0, -0.5]] {
        assert_eq!(Face::from_direction(d), Face::PositiveX, "{d:?}");
    }
    assert_eq!(Face::from_direction([-1.0, 1.0, -1.0]), Face::NegativeX);
    assert_eq!(Face::from_direction([0.0, 1.0, 1.0]), Face::PositiveY);
    assert_eq!(Face::from_direction([0.0, -2.0, -2.0]), Face::NegativeY);
}

#[test]
fn cross_dimension_validation() {
    for w in (1..40).filter(|w| w % 3 != 0) {
        let buf = PixelBuffer::new(w, 4 * (w / 3).max(1)).unwrap();
        assert_eq!(CrossLayout::new(buf), Err(DimensionError::CrossWidth(w)));
    }
    for h in (1..40).filter(|h| h % 4 != 0) {
        let buf = PixelBuffer::new(30, h).unwrap();
        assert_eq!(CrossLayout::new(buf), Err(DimensionError::CrossHeight(h)));
    }
    for n in 1..10 {
        assert_eq!(
            CrossLayout::new(PixelBuffer::new(3 * n, 4 * n).unwrap())
                .unwrap()
                .face_size(),
            n
        );
        assert!(CrossLayout::new(PixelBuffer::new(3 * n, 4 * (n + 1)).unwrap()).is_err());
    }
}

#[test]
fn non_2_to_1_panoramas_still_convert() {
    let pano = env_pano(100, 100);
    let cross = equirect_to_cross(&pano, 8).unwrap();
    assert!(cross.warning.is_some());
    let back = cross_to_equirect(&cross.image, 90, 30).unwrap();
    assert!(back.warning.is_some());
    assert_eq!(back.image.buffer().size(), zencross::Size::new(90, 30));
}

#[test]
fn hdr_file_to_cross_and_back() {
    use zencross::radiance;

    let hdr = radiance::encode(env_pano(64, 32).buffer()).unwrap();
    let pano = EquirectLayout::new(radiance::decode(&hdr).unwrap());
    let cross = equirect_to_cross(&pano, 16).unwrap().image;
    let bytes = radiance::encode(cross.buffer()).unwrap();
    let reread = CrossLayout::new(radiance::decode(&bytes).unwrap()).unwrap();
    assert_eq!(reread.face_size(), 16);
    for face in Face::ALL {
        let a = cross.face(face);
        let b = reread.face(face);
        for (x, y) in a.samples().iter().zip(b.samples()) {
            assert!((x - y).abs() < 0.02, "{face:?}: {x} vs {y}");
        }
    }
}
