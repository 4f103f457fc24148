use lbctl_core::plot::{plot, PlotConfig};

fn unscaled(height: usize) -> PlotConfig {
    PlotConfig::new(height, 0)
}

#[test]
fn rising_segment() {
    assert_eq!(plot(&[0.0, 1.0], &unscaled(2)), "1.00 ┤╭\n0.00 ┼╯");
}

#[test]
fn falling_segment() {
    assert_eq!(plot(&[1.0, 0.0], &unscaled(2)), "1.00 ┼╮\n0.00 ┤╰");
}

#[test]
fn peak_draws_vertical_bar() {
    let expected = "10.00 ┤╭╮\n 5.00 ┤│\n 0.00 ┼╯╰";
    assert_eq!(plot(&[0.0, 10.0, 0.0], &unscaled(3)), expected);
}

#[test]
fn constant_series_is_one_row() {
    assert_eq!(plot(&[5.0, 5.0, 5.0], &unscaled(20)), "5.00 ┼──");
}

#[test]
fn empty_series_draws_nothing() {
    assert_eq!(plot(&[], &PlotConfig::new(20, 100)), "");
}

#[test]
fn full_size_plot_has_fixed_height() {
    let graph = plot(&[1.0, 5.0, 3.0, 8.0], &PlotConfig::new(20, 100));
    let lines: Vec<&str> = graph.lines().collect();
    assert_eq!(lines.len(), 20);
    assert!(lines[0].starts_with("8.00 "));
    assert!(lines[19].starts_with("1.00 ┼"));
    for line in &lines {
        assert!(line.contains('┤') || line.contains('┼'));
        assert!(line.chars().count() <= 4 + 1 + 1 + 99);
    }
}
