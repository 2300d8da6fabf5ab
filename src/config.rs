// ProxAlert - Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V), host simulation elsewhere

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_BUTTON: i32 = 3; // D1    - Pause/resume button (INPUT_PULLDOWN, active HIGH)
pub const PIN_VIBRATION: i32 = 4; // D2    - Haptic motor control
pub const PIN_LED: i32 = 5; // D3    - Alert LED
pub const PIN_SPEAKER: i32 = 10; // D10   - Piezo speaker (LEDC PWM)
pub const PIN_I2C_SDA: i32 = 6; // D4    - I2C data line
pub const PIN_I2C_SCL: i32 = 7; // D5    - I2C clock line

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_BAUDRATE_KHZ: u32 = 100;
pub const I2C_ADDR_LCD: u8 = 0x3E;
pub const I2C_ADDR_RGB: u8 = 0x2D;
/// DIP-switch selectable addresses of the ADC expansion board.
pub const I2C_ADDR_ADC_BOARD: core::ops::RangeInclusive<u8> = 0x10..=0x13;
pub const I2C_ADDR_ADC_BOARD_DEFAULT: u8 = 0x10;

// ---------------------------------------------------------------------------
// Character Display (16x2, AIP31068-compatible)
// ---------------------------------------------------------------------------
pub const LCD_COLUMNS: usize = 16;
pub const LCD_MODE_COMMAND: u8 = 0x00;
pub const LCD_MODE_DATA: u8 = 0x40;
pub const LCD_CMD_CLEAR: u8 = 0x01;
pub const LCD_CMD_ROW_1: u8 = 0xC0;
pub const LCD_INIT_SEQUENCE: [u8; 6] = [0x33, 0x32, 0x28, 0x0C, 0x06, 0x01];
pub const LCD_LINE_BREAK: char = '\n';

// ---------------------------------------------------------------------------
// RGB Backlight Controller
// ---------------------------------------------------------------------------
pub const RGB_REG_MODE1: u8 = 0x00;
pub const RGB_REG_MODE2: u8 = 0x01;
pub const RGB_REG_OUTPUT: u8 = 0x08;
pub const RGB_OUTPUT_ALL_PWM: u8 = 0xAA;
pub const RGB_REG_RED: u8 = 0x04;
pub const RGB_REG_GREEN: u8 = 0x03;
pub const RGB_REG_BLUE: u8 = 0x02;

// ---------------------------------------------------------------------------
// ADC Expansion Board
// ---------------------------------------------------------------------------
pub const ADC_REG_PID: u8 = 0x01;
pub const ADC_REG_VID: u8 = 0x02;
pub const ADC_REG_PWM_CTRL: u8 = 0x03;
pub const ADC_REG_PWM_DUTY1: u8 = 0x06;
pub const ADC_REG_ADC_CTRL: u8 = 0x0E;
pub const ADC_REG_ADC_VAL1: u8 = 0x0F;
pub const ADC_EXPECTED_PID: u8 = 0xDF;
pub const ADC_EXPECTED_VID: u8 = 0x10;
pub const ADC_PWM_CHANNELS: u8 = 4;

// ---------------------------------------------------------------------------
// Speaker / Chime
// ---------------------------------------------------------------------------
pub const SPEAKER_IDLE_FREQ_HZ: u32 = 440;
pub const SPEAKER_DUTY_PERCENT: u8 = 50;
pub const CHIME_NOTE_A_HZ: u32 = 1318; // E6
pub const CHIME_NOTE_B_HZ: u32 = 1568; // G6
pub const CHIME_NOTE_MS: u32 = 150;
pub const CHIME_GAP_MS: u32 = 50;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const CYCLE_DELAY_MS: u32 = 2000; // between samples while enabled
pub const PAUSED_POLL_MS: u32 = 100; // button poll while paused
pub const DEBOUNCE_MS: u32 = 300; // settle after a toggle
pub const LCD_SETTLE_MS: u32 = 100; // after init / clear
pub const BOARD_RETRY_MS: u32 = 2000; // ADC board bring-up backoff

// ---------------------------------------------------------------------------
// Distance Calibration (10-bit ADC, 1276 mV full scale)
// ---------------------------------------------------------------------------
pub const CAL_FULL_SCALE_MV: f64 = 1276.0;
pub const CAL_ADC_DIVISOR: f64 = 1023.0 * 4.0;
pub const CAL_SENSOR_DIVISOR: f64 = 4.0;
pub const CAL_CM_FACTOR: f64 = 2.5;

// ---------------------------------------------------------------------------
// Severity Thresholds (cm, lower bound of the next less severe level)
// ---------------------------------------------------------------------------
pub const THRESHOLD_CRITICAL_CM: i32 = 5;
pub const THRESHOLD_WARNING_CM: i32 = 10;
pub const THRESHOLD_CAUTION_CM: i32 = 15;
