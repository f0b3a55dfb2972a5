use crate::braille::BrailleCanvas;

/// Bresenham line between two dot positions, endpoints included.
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let step_x = if x0 < x1 { 1 } else { -1 };
    let step_y = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        canvas.set_pixel_signed(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += step_x;
        }
        if e2 <= dx {
            err += dx;
            y += step_y;
        }
    }
}

/// Filled disc (marker).
pub fn draw_disc(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Circle outline via the midpoint algorithm (sphere silhouette, hover ring).
pub fn draw_ring(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    if radius <= 0 {
        canvas.set_pixel_signed(cx, cy);
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        for (px, py) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
            canvas.set_pixel_signed(cx + px, cy + py);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0);
        assert!((0..10).all(|x| canvas.is_set(x, 0)));
        assert!(!canvas.is_set(0, 1));
    }

    #[test]
    fn test_diagonal_line() {
        let mut canvas = BrailleCanvas::new(2, 1);
        draw_line(&mut canvas, 3, 3, 0, 0);
        assert_eq!(canvas.to_string(), "⠑⢄");
    }

    #[test]
    fn test_line_clipped_off_canvas() {
        let mut canvas = BrailleCanvas::new(2, 2);
        draw_line(&mut canvas, -5, 2, 3, 2);
        assert!(canvas.is_set(0, 2));
        assert!(canvas.is_set(3, 2));
    }

    #[test]
    fn test_disc_fills_center() {
        let mut canvas = BrailleCanvas::new(4, 2);
        draw_disc(&mut canvas, 3, 3, 2);
        assert!(canvas.is_set(3, 3));
        assert!(canvas.is_set(5, 3));
        assert!(canvas.is_set(3, 1));
        assert!(!canvas.is_set(5, 5));
    }

    #[test]
    fn test_ring_is_hollow() {
        let mut canvas = BrailleCanvas::new(10, 5);
        draw_ring(&mut canvas, 10, 10, 6);
        assert!(canvas.is_set(16, 10));
        assert!(canvas.is_set(4, 10));
        assert!(canvas.is_set(10, 4));
        assert!(canvas.is_set(10, 16));
        assert!(!canvas.is_set(10, 10));
    }
}
