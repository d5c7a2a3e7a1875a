use googletest::prelude::*;
use num::rational::Ratio;
use rstest::rstest;
use serde_test::{assert_tokens, Token};

use super::*;

#[googletest::test]
#[rstest]
#[case::film_pulldown(24_000, 1_001, false, FrameRate::Fps23_976)]
#[case::film(24, 1, false, FrameRate::Fps24)]
#[case::pal(25, 1, false, FrameRate::Fps25)]
#[case::ntsc(30_000, 1_001, false, FrameRate::Fps29_97)]
#[case::thirty(30, 1, false, FrameRate::Fps30)]
#[case::pal_double(50, 1, false, FrameRate::Fps50)]
#[case::ntsc_double(60_000, 1_001, false, FrameRate::Fps59_94)]
#[case::sixty(60, 1, false, FrameRate::Fps60)]
#[case::ntsc_drop(30_000, 1_001, true, FrameRate::Fps29_97Df)]
#[case::ntsc_double_drop(60_000, 1_001, true, FrameRate::Fps59_94Df)]
fn test_from_parts(
    #[case] numerator: u32,
    #[case] denominator: u32,
    #[case] drop_frame: bool,
    #[case] expected: FrameRate,
) {
    expect_that!(FrameRate::from_parts(numerator, denominator, drop_frame), ok(eq(&expected)));
}

#[googletest::test]
#[rstest]
#[case::drop_on_integer_rate(30, 1, true)]
#[case::drop_on_pal(25, 1, true)]
#[case::unknown_rate(12, 1, false)]
#[case::unreduced_alias(60_000, 2_002, false)]
fn test_from_parts_rejects_unrecognized(
    #[case] numerator: u32,
    #[case] denominator: u32,
    #[case] drop_frame: bool,
) {
    let expected = format!(
        "{numerator}/{denominator} fps (drop frame: {drop_frame}) is not a recognized \
        LTC frame rate"
    );
    expect_that!(
        FrameRate::from_parts(numerator, denominator, drop_frame).map_err(|e| e.to_string()),
        err(eq(expected.as_str()))
    );
}

#[googletest::test]
#[rstest]
#[case(FrameRate::Fps23_976, 24)]
#[case(FrameRate::Fps24, 24)]
#[case(FrameRate::Fps25, 25)]
#[case(FrameRate::Fps29_97, 30)]
#[case(FrameRate::Fps30, 30)]
#[case(FrameRate::Fps50, 50)]
#[case(FrameRate::Fps59_94, 60)]
#[case(FrameRate::Fps60, 60)]
#[case(FrameRate::Fps29_97Df, 30)]
#[case(FrameRate::Fps59_94Df, 60)]
fn test_nominal_fps_is_ceiling_of_exact_rate(#[case] rate: FrameRate, #[case] expected: u8) {
    expect_that!(rate.nominal_fps(), eq(expected));
}

#[googletest::test]
fn test_exact_fps() {
    expect_that!(FrameRate::Fps29_97Df.exact_fps(), eq(Ratio::new(30_000u32, 1_001u32)));
    expect_that!(FrameRate::Fps25.exact_fps(), eq(Ratio::from(25u32)));
}

#[googletest::test]
fn test_drop_frame_flag() {
    let drop: Vec<FrameRate> =
        FrameRate::ALL.into_iter().filter(|rate| rate.is_drop_frame()).collect();
    expect_that!(drop, elements_are![eq(&FrameRate::Fps29_97Df), eq(&FrameRate::Fps59_94Df)]);
}

#[googletest::test]
#[rstest]
#[case(FrameRate::Fps23_976, "23.976 NDF")]
#[case(FrameRate::Fps29_97Df, "29.97 DF")]
#[case(FrameRate::Fps59_94Df, "59.94 DF")]
#[case(FrameRate::Fps60, "60 NDF")]
fn test_display_label(#[case] rate: FrameRate, #[case] label: &str) {
    expect_that!(rate.to_string(), eq(label));
}

#[googletest::test]
fn test_serde_uses_display_label() {
    assert_tokens(
        &FrameRate::Fps29_97Df,
        &[Token::UnitVariant { name: "FrameRate", variant: "29.97 DF" }],
    );
    assert_tokens(
        &FrameRate::Fps23_976,
        &[Token::UnitVariant { name: "FrameRate", variant: "23.976 NDF" }],
    );
}
