use clip::{
    ClassifiedImage, Clipper, Color, Hsv, OwnedImage, Pos, Rect, Settings,
    compose::{Collage, Row},
};

const WEAPON: Hsv = Hsv::new(181.0, 0.49, 0.65);
const SUMMON: Hsv = Hsv::new(33.0, 0.49, 0.49);
const ADDITIONAL: Hsv = Hsv::new(211.0, 0.44, 0.76);
const CYAN: Color = Color::new(0, 200, 230);

fn paint(img: &mut OwnedImage, x: u32, y: u32, hsv: Hsv) {
    let c = hsv.to_rgb();
    img.set_rgba(x, y, [c.r, c.g, c.b, 255]);
}

/// Black canvas with the two header markers, green at `green`, orange 305px
/// to the right and five rows up.
fn card(w: u32, h: u32, green: (u32, u32)) -> OwnedImage {
    let s = Settings::default();
    let mut img = OwnedImage::filled(w, h, Color::BLACK);
    paint(&mut img, green.0, green.1, s.green_anchor.hsv);
    paint(&mut img, green.0 + 305, green.1 - 5, s.orange_anchor.hsv);
    img
}

#[test]
fn anchors_without_probes_fall_through_to_unknown() {
    let img = card(800, 800, (50, 50));
    let result = Clipper::default().classify(&img);

    assert_eq!(result.weapon.green_pos, Some(Pos::new(50, 50)));
    assert_eq!(result.weapon.orange_pos, Some(Pos::new(355, 45)));
    assert_eq!(result.weapon.ratio(), Some(1.0));
    assert!(!result.weapon.is_weapon);
    assert!(!result.weapon.is_dual);
    assert!(!result.weapon.is_additional);
    assert!(!result.weapon.is_summon);

    let character = result.character.as_ref().expect("character path ran");
    assert!(!character.is_character());
    assert_eq!(result.image, ClassifiedImage::Unknown { image: img });
}

#[test]
fn blank_screenshot_is_unknown() {
    let img = OwnedImage::filled(300, 200, Color::WHITE);
    let result = Clipper::default().classify(&img);
    assert_eq!(result.weapon.green_pos, None);
    assert!(result.weapon.layout.is_none());
    assert_eq!(result.image.kind(), "Unknown");
}

#[test]
fn weapon_with_additional_skill_stacks_two_crops() {
    let mut img = card(800, 800, (50, 50));
    paint(&mut img, 90, 80, WEAPON);
    paint(&mut img, 111, 587, ADDITIONAL);
    // corners of the two crops
    img.set_rgba(42, 90, [1, 2, 3, 255]);
    img.set_rgba(42, 576, [4, 5, 6, 255]);

    let result = Clipper::default().classify(&img);
    let ClassifiedImage::Weapon { is_additional, is_dual, image } = &result.image else {
        panic!("expected weapon, got {}", result.image.kind());
    };
    assert!(*is_additional);
    assert!(!*is_dual);
    assert_eq!((image.width(), image.height()), (598, 464 + 158));
    assert_eq!(image.rgba(0, 0), [1, 2, 3, 255]);
    assert_eq!(image.rgba(0, 464), [4, 5, 6, 255]);
    assert!(result.character.is_none());
}

#[test]
fn plain_weapon_is_a_single_crop() {
    let mut img = card(800, 800, (50, 50));
    paint(&mut img, 90, 80, WEAPON);
    let result = Clipper::default().classify(&img);
    assert_eq!(result.image.kind(), "Weapon");
    let image = result.image.image();
    assert_eq!((image.width(), image.height()), (598, 464));
}

#[test]
fn weapon_crop_past_the_left_edge_is_padded() {
    let mut img = card(800, 800, (2, 40));
    paint(&mut img, 42, 70, WEAPON);
    let result = Clipper::default().classify(&img);
    let layout = result.weapon.layout.expect("layout");
    assert_eq!(layout.weapon_pos1, Rect::new(-6, 80, 598, 464));

    let image = result.image.image();
    assert_eq!(image.rgba(5, 10), [0, 0, 0, 0]);
    assert_eq!(image.rgba(6, 10), [0, 0, 0, 255]);
}

#[test]
fn summon_stacks_both_panels() {
    let mut img = card(800, 800, (50, 50));
    paint(&mut img, 50, 80, SUMMON);
    let result = Clipper::default().classify(&img);
    assert_eq!(result.image.kind(), "Summon");
    let image = result.image.image();
    assert_eq!((image.width(), image.height()), (600, 460 + 140));
}

#[test]
fn weapon_wins_over_summon() {
    let mut img = card(800, 800, (50, 50));
    paint(&mut img, 90, 80, WEAPON);
    paint(&mut img, 50, 80, SUMMON);
    let result = Clipper::default().classify(&img);
    assert!(result.weapon.is_weapon && result.weapon.is_summon);
    assert_eq!(result.image.kind(), "Weapon");
}

#[test]
fn geometry_scales_with_marker_distance() {
    let s = Settings::default();
    let mut img = OwnedImage::filled(500, 500, Color::BLACK);
    paint(&mut img, 20, 40, s.green_anchor.hsv);
    // 183 / 305 = 0.6
    paint(&mut img, 203, 35, s.orange_anchor.hsv);
    paint(&mut img, 44, 58, WEAPON);

    let result = Clipper::default().classify(&img);
    assert!(result.weapon.is_weapon);
    assert_eq!(result.weapon.layout.unwrap().weapon_pos1, Rect::new(15, 64, 359, 278));
}

#[test]
fn character_bar_is_clipped() {
    let mut img = OwnedImage::filled(600, 400, Color::BLACK);
    for y in 50..150 {
        for x in 100..272 {
            img.set_rgba(x, y, [CYAN.r, CYAN.g, CYAN.b, 255]);
        }
    }
    img.set_rgba(100, 50, [CYAN.r, CYAN.g, CYAN.b, 254]);

    let result = Clipper::default().classify(&img);
    let ClassifiedImage::Character { image } = &result.image else {
        panic!("expected character, got {}", result.image.kind());
    };
    assert_eq!((image.width(), image.height()), (172, 100));
    assert_eq!(image.rgba(0, 0)[3], 254);

    let character = result.character.expect("character path ran");
    assert_eq!(character.character_pos, Some(Rect::new(100, 50, 172, 100)));
    assert_eq!(character.mask.count(), 172 * 100);
}

#[test]
fn classified_images_compose_into_rows() {
    let clipper = Clipper::default();

    let mut weapon = card(800, 800, (50, 50));
    paint(&mut weapon, 90, 80, WEAPON);

    let mut character = OwnedImage::filled(600, 400, Color::BLACK);
    for y in 50..150 {
        for x in 100..272 {
            character.set_rgba(x, y, [CYAN.r, CYAN.g, CYAN.b, 255]);
        }
    }

    let mut collage = Collage::new();
    for img in [&weapon, &character] {
        collage.push(clipper.classify(img).image);
    }
    assert_eq!(collage.row(Row::Upper).len(), 1);
    assert_eq!(collage.row(Row::Lower).len(), 1);

    let out = clipper.compose(&collage).unwrap().expect("output");
    // 598x464 -> 773x600, 172x100 -> 688x400
    assert_eq!((out.width(), out.height()), (773, 1000));
    assert_eq!(out.rgba(772, 999), [255, 255, 255, 255]);
}

#[test]
fn standalone_detectors_agree_with_classify() {
    let clipper = Clipper::default();
    let mut img = card(800, 800, (50, 50));
    paint(&mut img, 50, 80, SUMMON);

    let result = clipper.classify(&img);
    assert_eq!(clipper.weapon_detect(&img), result.weapon);
    assert!(!clipper.character_detect(&img).is_character());
    assert!(!clipper.extra_back_detect(&img).is_character());
    assert_eq!(clipper.settings(), &Settings::default());

    let image = result.image.into_image();
    assert_eq!((image.width(), image.height()), (600, 600));
}
