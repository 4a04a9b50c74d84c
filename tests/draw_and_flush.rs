// End-to-end: embedded-graphics draws into a panel, the driver pushes bytes
// through a recording transport.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use monopanel::gu900::Gu900;
use monopanel::gui::{Capabilities, DisplayRegistry, Registration};
use monopanel::ssd1306::Ssd1306;
use monopanel::{DisplayTransport, DriverError, PanelConfig};

#[derive(Default)]
struct Wire {
    commands: Vec<(u8, Vec<u8>)>,
    data: Vec<Vec<u8>>,
    broken: bool,
}

#[derive(Debug, PartialEq)]
struct Nack;

impl DisplayTransport for Wire {
    type Error = Nack;

    fn write_command(&mut self, command: u8) -> Result<(), Nack> {
        self.write_command_with_params(command, &[])
    }

    fn write_command_with_params(&mut self, command: u8, params: &[u8]) -> Result<(), Nack> {
        if self.broken {
            return Err(Nack);
        }
        self.commands.push((command, params.to_vec()));
        Ok(())
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Nack> {
        if self.broken {
            return Err(Nack);
        }
        self.data.push(data.to_vec());
        Ok(())
    }
}

#[test]
fn text_on_oled_only_resends_touched_pages() {
    let mut wire = Wire::default();
    let mut oled = Ssd1306::new(&mut wire, PanelConfig::ssd1306_128x64()).unwrap();
    oled.init().unwrap();

    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    Text::new("Hi", Point::new(0, 20), style).draw(&mut oled).unwrap();

    // FONT_6X10 with baseline at y=20 covers rows 12..=21: pages 1 and 2
    let dirty: Vec<usize> = oled.framebuffer().redraw_dirty_pages().map(|s| s.page).collect();
    assert_eq!(dirty, [1, 2]);
    assert_eq!(oled.redraw(), Ok(2));
    assert_eq!(oled.redraw(), Ok(0));
    drop(oled);

    // init frame plus one page each
    assert_eq!(wire.data.len(), 3);
    assert_eq!(wire.data[0].len(), 1024);
    assert!(wire.data[1..].iter().all(|page| page.len() == 128));
    assert!(wire.data[1].iter().any(|&b| b != 0));
}

#[test]
fn broken_bus_keeps_work_for_later() {
    let mut wire = Wire::default();
    let mut oled = Ssd1306::new(&mut wire, PanelConfig::ssd1306_128x32()).unwrap();
    Line::new(Point::new(0, 0), Point::new(127, 31))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(&mut oled)
        .unwrap();

    {
        let fb = oled.framebuffer();
        assert_eq!(fb.redraw_dirty_pages().count(), 4);
    }

    let mut broken = Wire { broken: true, ..Wire::default() };
    let mut failing = Ssd1306::new(&mut broken, PanelConfig::ssd1306_128x32()).unwrap();
    failing.framebuffer_mut().set_lit(0, 0, true).unwrap();
    assert_eq!(failing.redraw(), Err(DriverError::Transport(Nack)));
    assert!(failing.framebuffer().is_page_dirty(0));

    assert_eq!(oled.redraw(), Ok(4));
}

#[test]
fn gui_registration_drives_the_vfd() {
    let mut wire = Wire::default();
    let mut vfd = Gu900::new(&mut wire, PanelConfig::gu128x32()).unwrap();
    {
        let mut reg = Registration::new(&mut vfd);
        assert!(reg.capabilities().contains(Capabilities::ROUNDER));
        assert_eq!(reg.resolution(), Size::new(128, 32));

        let area = reg.round(&Rectangle::new(Point::new(10, 5), Size::new(2, 2)));
        assert_eq!(area, Rectangle::new(Point::new(10, 0), Size::new(2, 32)));

        let colors = (0..area.size.width * area.size.height).map(|i| {
            if i < 2 { BinaryColor::On } else { BinaryColor::Off }
        });
        reg.flush(&area, colors).unwrap();
    }
    assert_eq!(vfd.framebuffer().pixel(10, 0), Ok(true));
    assert_eq!(vfd.framebuffer().pixel(11, 0), Ok(true));
    assert_eq!(vfd.framebuffer().pixel(10, 1), Ok(false));
    drop(vfd);

    // header then the two columns, 4 bytes each, MSB = top row
    assert_eq!(wire.data.len(), 2);
    assert_eq!(wire.data[1], [0x80, 0, 0, 0, 0x80, 0, 0, 0]);
}

#[test]
fn registry_routes_gui_calls_to_the_default_panel() {
    let mut left_wire = Wire::default();
    let mut right_wire = Wire::default();
    let mut left = Ssd1306::new(&mut left_wire, PanelConfig::ssd1306_128x32()).unwrap();
    let mut right = Ssd1306::new(&mut right_wire, PanelConfig::ssd1306_128x32()).unwrap();
    {
        let mut registry: DisplayRegistry<'_, _, 2> = DisplayRegistry::new();
        let first = registry.add(&mut left).ok().unwrap();
        let second = registry.add(&mut right).ok().unwrap();
        assert_eq!(registry.default_id(), Some(first));

        assert!(registry.set_default(second));
        let reg = registry.default_display().unwrap();
        let band = Rectangle::new(Point::new(0, 8), Size::new(128, 8));
        assert!(reg.gpu_fill(&band, BinaryColor::On));
        assert!(!reg.set_pixel(0, 40, BinaryColor::On));
        reg.flush(&band, core::iter::repeat(BinaryColor::On)).unwrap();
    }
    assert_eq!(left.framebuffer().redraw_dirty_pages().count(), 0);
    assert_eq!(right.framebuffer().pixel(64, 12), Ok(true));
    assert_eq!(right.redraw(), Ok(0));
    drop(left);
    drop(right);

    assert!(left_wire.data.is_empty());
    assert_eq!(right_wire.data, [vec![0xFF; 128]]);
}
