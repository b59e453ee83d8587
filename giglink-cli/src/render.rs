//! Terminal rendering helpers

use chrono::{DateTime, Local, Utc};
use console::style;

use giglink_core::models::{
    ConversationSummary, DashboardStats, Favorite, Message, Order, Profile, Proposal,
};

fn local_time(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn print_conversations(list: &[ConversationSummary]) {
    if list.is_empty() {
        println!("{}", style("No conversations.").dim());
        return;
    }
    for c in list {
        let unread = if c.unread_count > 0 {
            format!(" {}", style(format!("[{} new]", c.unread_count)).green().bold())
        } else {
            String::new()
        };
        println!(
            "{}  {} — {}{}",
            style(&c.id).dim(),
            style(&c.order_title).bold(),
            c.other_user.display_name,
            unread
        );
        if let Some(last) = &c.last_message {
            println!(
                "      {} {}",
                style(local_time(&last.created_at)).dim(),
                last.content
            );
        }
    }
}

pub fn print_messages(messages: &[Message]) {
    if messages.is_empty() {
        println!("{}", style("No messages yet.").dim());
        return;
    }
    for m in messages {
        println!(
            "{} {}",
            style(local_time(&m.created_at)).dim(),
            style(&m.sender_id).bold()
        );
        println!("  {}", m.content);
    }
}

pub fn print_orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("{}", style("No orders found.").dim());
        return;
    }
    for order in orders {
        println!(
            "{}  {}  {}  {}",
            style(&order.id).dim(),
            style(&order.title).bold(),
            style(order.status.to_string()).cyan(),
            style(format!("${:.2}", order.budget)).yellow()
        );
    }
}

pub fn print_order(order: &Order) {
    println!("{}", style(&order.title).bold());
    println!("  id:       {}", order.id);
    println!("  status:   {}", style(order.status.to_string()).cyan());
    println!("  budget:   {}", style(format!("${:.2}", order.budget)).yellow());
    if let Some(category) = &order.category {
        println!("  category: {}", category);
    }
    println!("  posted:   {}", local_time(&order.created_at));
    if let Some(deadline) = &order.deadline {
        println!("  deadline: {}", local_time(deadline));
    }
    if !order.description.is_empty() {
        println!("\n{}", order.description);
    }
}

pub fn print_proposals(proposals: &[Proposal]) {
    if proposals.is_empty() {
        println!("{}", style("No proposals.").dim());
        return;
    }
    for p in proposals {
        println!(
            "{}  {}  {} in {} days  ({})",
            style(&p.id).dim(),
            style(p.status.to_string()).cyan(),
            style(format!("${:.2}", p.bid_amount)).yellow(),
            p.delivery_days,
            local_time(&p.created_at)
        );
        println!("      {}", p.cover_letter);
    }
}

pub fn print_favorites(favorites: &[Favorite]) {
    if favorites.is_empty() {
        println!("{}", style("No favorites saved.").dim());
        return;
    }
    for f in favorites {
        println!(
            "{}  {}  saved {}",
            style(&f.order_id).dim(),
            style(&f.order_title).bold(),
            style(local_time(&f.saved_at)).dim()
        );
    }
}

pub fn print_profile(profile: &Profile) {
    println!(
        "{} {}",
        style(&profile.display_name).bold(),
        style(format!("@{}", profile.username)).dim()
    );
    println!("  role:    {}", style(profile.role.to_string()).cyan());
    if let Some(rate) = profile.hourly_rate {
        println!("  rate:    {}", style(format!("${:.0}/h", rate)).yellow());
    }
    if let Some(rating) = profile.rating {
        println!("  rating:  {:.1} ({} reviews)", rating, profile.reviews_count);
    }
    if !profile.skills.is_empty() {
        println!("  skills:  {}", profile.skills.join(", "));
    }
    if !profile.bio.is_empty() {
        println!("\n{}", profile.bio);
    }
    if !profile.portfolio.is_empty() {
        println!("\n{}", style("Portfolio").bold());
        for item in &profile.portfolio {
            println!("  - {}", item.title);
            if let Some(link) = &item.link {
                println!("    {}", style(link).dim());
            }
        }
    }
}

pub fn print_stats(stats: &DashboardStats) {
    println!("{}", style("Dashboard").bold());
    println!("  active orders:        {}", stats.active_orders);
    println!("  completed orders:     {}", stats.completed_orders);
    println!("  pending proposals:    {}", stats.pending_proposals);
    println!("  unread conversations: {}", stats.unread_conversations);
    println!("  favorites:            {}", stats.favorites);
}
