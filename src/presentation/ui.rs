use crate::application::{Alert, App, AuthRoute, MainRoute, RootFlow, Tab, TextField};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    match app.flow() {
        RootFlow::Auth => render_auth(f, app),
        RootFlow::Main => render_main(f, app),
    }

    if let Some(alert) = app.alerts.current() {
        render_alert_popup(f, alert);
    }
}

fn render_auth(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = match app.auth_route {
        AuthRoute::SignIn => "termgram - Sign In",
        AuthRoute::SignUp => "termgram - Create Account",
    };
    let header = Paragraph::new(title).style(Style::default().fg(Color::Cyan));
    f.render_widget(header, chunks[0]);

    match app.auth_route {
        AuthRoute::SignIn => render_sign_in(f, app, chunks[1]),
        AuthRoute::SignUp => render_sign_up(f, app, chunks[1]),
    }

    render_status_bar(f, app, chunks[2]);
}

fn render_sign_in(f: &mut Frame, app: &App, area: Rect) {
    let form = centered_form(area, 8);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(form);

    render_field(f, rows[0], "Email", &app.sign_in.email, app.sign_in.focus == 0, false);
    render_field(
        f,
        rows[1],
        "Password",
        &app.sign_in.password,
        app.sign_in.focus == 1,
        true,
    );

    let action = if app.session.loading {
        "Signing in..."
    } else {
        "Enter: login | Ctrl+N: create account | Tab: next field"
    };
    let hint = Paragraph::new(action)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hint, rows[2]);
}

fn render_sign_up(f: &mut Frame, app: &App, area: Rect) {
    let form = centered_form(area, 11);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(form);

    render_field(
        f,
        rows[0],
        "Username",
        &app.sign_up.username,
        app.sign_up.focus == 0,
        false,
    );
    render_field(f, rows[1], "Email", &app.sign_up.email, app.sign_up.focus == 1, false);
    render_field(
        f,
        rows[2],
        "Password",
        &app.sign_up.password,
        app.sign_up.focus == 2,
        true,
    );

    let action = if app.session.loading {
        "Signing up..."
    } else {
        "Enter: create account | Esc: back to sign in | Tab: next field"
    };
    let hint = Paragraph::new(action)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hint, rows[3]);
}

fn render_main(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    match app.main_route {
        MainRoute::Tabs => match app.tab {
            Tab::Home => render_home(f, app, chunks[0]),
            Tab::CreatePost => render_composer(f, app, chunks[0]),
            Tab::Profile => render_profile(f, app, chunks[0]),
        },
        MainRoute::Post { .. } => render_post(f, app, chunks[0]),
        MainRoute::Comments { .. } => render_comments(f, app, chunks[0]),
        MainRoute::EditProfile => render_edit_profile(f, app, chunks[0]),
        MainRoute::Settings => render_settings(f, chunks[0]),
    }

    render_tab_bar(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);
}

fn render_home(f: &mut Frame, app: &App, area: Rect) {
    let title = if app.feed_loading { "Home (loading...)" } else { "Home" };

    let rows: Vec<Row> = app
        .feed
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let style = if i == app.selected_post {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(post.author_name().to_string()),
                Cell::from(post.caption().to_string()),
                Cell::from(format!("{} photo(s)", post.images.len())),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Min(20),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Author", "Caption", "Images"])
                .style(Style::default().fg(Color::Yellow)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_post(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Post");

    let Some(detail) = &app.post_detail else {
        let loading = Paragraph::new("Loading post...").block(block);
        f.render_widget(loading, area);
        return;
    };

    let image_line = if detail.post.images.is_empty() {
        "(no images)".to_string()
    } else {
        let current = &detail.post.images[app.carousel_index.min(detail.post.images.len() - 1)];
        format!(
            "[ image {}/{} ] {}",
            app.carousel_index + 1,
            detail.post.images.len(),
            current.url
        )
    };

    let like_marker = if detail.liked_by_viewer { "♥" } else { "♡" };
    let lines = vec![
        Line::from(format!("by {}", detail.post.author_name())),
        Line::from(""),
        Line::from(image_line),
        Line::from(""),
        Line::from(format!("{} {} likes", like_marker, detail.likes)),
        Line::from(""),
        Line::from(detail.post.caption().to_string()),
        Line::from(""),
        Line::from("h/l: carousel | f: like | c: comments | Esc: back"),
    ];

    let body = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(body, area);
}

fn render_comments(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let lines: Vec<Line> = app
        .comments
        .iter()
        .map(|comment| {
            let author = comment
                .user
                .as_ref()
                .map(|u| u.display_name())
                .unwrap_or("anonymous");
            Line::from(format!("{}: {}", author, comment.content))
        })
        .collect();

    let list = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Comments"))
        .wrap(Wrap { trim: false });
    f.render_widget(list, chunks[0]);

    render_field(f, chunks[1], "Add a comment (Enter to post)", &app.comment_input, true, false);
}

fn render_profile(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Profile");

    let Some(user) = &app.session.user else {
        f.render_widget(Paragraph::new("No profile").block(block), area);
        return;
    };

    let profile = user.profile.as_ref();
    let lines = vec![
        Line::from(format!("Name:     {}", user.display_name())),
        Line::from(format!("Username: {}", user.username)),
        Line::from(format!("Email:    {}", user.email)),
        Line::from(format!(
            "Bio:      {}",
            profile.and_then(|p| p.bio.as_deref()).unwrap_or("-")
        )),
        Line::from(""),
        Line::from("e: edit profile | s: settings"),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_edit_profile(f: &mut Frame, app: &App, area: Rect) {
    let form = centered_form(area, 8);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(form);

    render_field(f, rows[0], "Name", &app.profile_form.name, app.profile_form.focus == 0, false);
    render_field(f, rows[1], "Bio", &app.profile_form.bio, app.profile_form.focus == 1, false);

    let hint = Paragraph::new("Enter: save | Esc: cancel | Tab: next field")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hint, rows[2]);
}

fn render_composer(f: &mut Frame, app: &App, area: Rect) {
    let form = centered_form(area, 8);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(form);

    render_field(f, rows[0], "Caption", &app.composer.caption, app.composer.focus == 0, false);
    render_field(
        f,
        rows[1],
        "Image URLs (space separated)",
        &app.composer.image_urls,
        app.composer.focus == 1,
        false,
    );

    let hint = Paragraph::new("Enter: publish | Esc: back to home | Tab: next field")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hint, rows[2]);
}

fn render_settings(f: &mut Frame, area: Rect) {
    let body = Paragraph::new(vec![
        Line::from("Settings"),
        Line::from(""),
        Line::from("Enter: sign out"),
        Line::from("Esc:   back"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Settings"));
    f.render_widget(body, area);
}

fn render_tab_bar(f: &mut Frame, app: &App, area: Rect) {
    let selected = match app.tab {
        Tab::Home => 0,
        Tab::CreatePost => 1,
        Tab::Profile => 2,
    };
    let tabs = Tabs::new(vec!["1 Home", "2 Create", "3 Profile"])
        .select(selected)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(tabs, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = if let Some(ref status) = app.status_message {
        status.clone()
    } else if app.session.loading {
        "Working...".to_string()
    } else {
        match app.flow() {
            RootFlow::Auth => "Ctrl+C: quit".to_string(),
            RootFlow::Main => "1/2/3: tabs | Ctrl+C or q: quit".to_string(),
        }
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn render_field(
    f: &mut Frame,
    area: Rect,
    title: &str,
    field: &TextField,
    focused: bool,
    mask: bool,
) {
    let shown = if mask {
        "*".repeat(field.value.chars().count())
    } else {
        field.value.clone()
    };

    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let input = Paragraph::new(shown)
        .block(Block::default().borders(Borders::ALL).title(title).style(style));
    f.render_widget(input, area);
}

fn render_alert_popup(f: &mut Frame, alert: &Alert) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 6,
        y: area.height / 3,
        width: area.width * 2 / 3,
        height: 7u16.min(area.height),
    };

    f.render_widget(Clear, popup_area);

    let body = Paragraph::new(vec![
        Line::from(alert.message.clone()),
        Line::from(""),
        Line::from("(Enter to dismiss)"),
    ])
    .wrap(Wrap { trim: false })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(alert.title.clone())
            .style(Style::default().fg(Color::Red)),
    );
    f.render_widget(body, popup_area);
}

fn centered_form(area: Rect, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(height),
            Constraint::Min(1),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical[1]);
    horizontal[1]
}
